//! Selection line and checkout snapshot

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product's aggregated selection
///
/// `deduction` normally follows the discount formula but may be overridden by
/// hand; the override holds until the next quantity change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionLine {
    pub product_id: i64,
    pub title: String,
    pub unit_price: Decimal,
    /// Always >= 1 while the line exists
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<Decimal>,
    pub deduction: Decimal,
}

impl SelectionLine {
    /// Gross line amount (unit price × quantity), capped at `Decimal::MAX`
    pub fn gross(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Selection copied at the moment the shopper leaves the catalog
///
/// Owned by the checkout session afterwards; later edits to the live
/// selection never reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSnapshot {
    pub lines: Vec<SelectionLine>,
    pub gross_total: Decimal,
    pub total_deduction: Decimal,
}

impl CheckoutSnapshot {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
