//! Shared types for the checkout workspace
//!
//! Wire types consumed from the catalog/auth endpoints, the selection and
//! payment types carried between screens, and small id/date helpers used by
//! both `catalog-client` and `checkout-engine`.

pub mod checkout;
pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

pub use checkout::{CheckoutSnapshot, PaymentRecord, PaymentStatus, SelectionLine};
pub use client::{LoginRequest, LoginResponse, StoredUser};
pub use models::{DiscountInput, Product, ProductPage};
