//! Data models
//!
//! Read-only catalog types as returned by the external product source.

pub mod product;

// Re-exports
pub use product::*;
