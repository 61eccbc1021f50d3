//! Checkout types
//!
//! Types carried from the browsing screen to review and from review to the
//! receipt:
//! - Selection lines: one aggregated line per selected product
//! - Snapshot: immutable copy of the selection taken on leaving the catalog
//! - Payment record: reference, date and outcome of one review session

pub mod payment;
pub mod types;

// Re-exports
pub use payment::{PaymentRecord, PaymentStatus};
pub use types::{CheckoutSnapshot, SelectionLine};
