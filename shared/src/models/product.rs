//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Discount percentage exactly as the catalog sent it.
///
/// The catalog is not strict about this field: it may be a JSON number, a
/// numeric string, or something else entirely. Coercion to a number happens
/// in the engine's money policy, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiscountInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Catalog product (external, read-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    /// Unit price, non-negative
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<DiscountInput>,
}

impl Product {
    pub fn new(id: i64, title: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            discount_percentage: None,
        }
    }

    /// Attach a raw discount value
    pub fn with_discount(mut self, discount: DiscountInput) -> Self {
        self.discount_percentage = Some(discount);
        self
    }
}

/// One page of the paged product listing
///
/// Both fields are optional on the wire; a missing list is an empty page and
/// a missing total is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
}
