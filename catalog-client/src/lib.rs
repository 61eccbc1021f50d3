//! Catalog Client - HTTP client for the product catalog and auth endpoints
//!
//! Provides the paged product listing (`GET products?limit=&skip=`) and the
//! credential login (`POST auth/login`) the checkout engine consumes.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::CatalogClient;

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse, StoredUser};
pub use shared::models::{Product, ProductPage};
