//! Payment record

use serde::{Deserialize, Serialize};

/// Payment outcome for a review session
///
/// Forward-only: a record never returns to `Pending`. An insufficient
/// attempt stays `Insufficient` until a later attempt in the same session
/// succeeds (the wallet may have changed in between).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Insufficient,
    Confirmed,
}

/// Payment metadata generated once when review starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Short random token, stable for the whole session
    pub reference: String,
    /// Long human-readable date, e.g. `19 October 2026`
    pub date: String,
    pub customer_label: String,
    /// Code as entered on the verification pad when the payment went through
    #[serde(default)]
    pub verification_code: String,
    pub status: PaymentStatus,
}

impl PaymentRecord {
    pub fn new(
        reference: impl Into<String>,
        date: impl Into<String>,
        customer_label: impl Into<String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            date: date.into(),
            customer_label: customer_label.into(),
            verification_code: String::new(),
            status: PaymentStatus::Pending,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == PaymentStatus::Confirmed
    }
}
