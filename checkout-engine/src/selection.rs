//! Selection aggregator
//!
//! One line per selected product, in the order products were first added.
//! Quantity changes always recompute the line deduction from the stored
//! discount percent; a manual deduction override survives only until the
//! next quantity change.

use crate::money::{coerce_discount, line_deduction, parse_deduction, parse_quantity, sum_amounts};
use rust_decimal::Decimal;
use shared::{CheckoutSnapshot, Product, SelectionLine};

/// Live selection owned by the browsing screen
#[derive(Debug, Clone, Default)]
pub struct SelectionAggregator {
    lines: Vec<SelectionLine>,
}

impl SelectionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[SelectionLine] {
        &self.lines
    }

    pub fn line(&self, product_id: i64) -> Option<&SelectionLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: i64) -> Option<&mut SelectionLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add one unit of `product`
    ///
    /// A new line starts at quantity 1; a repeat add increments the quantity
    /// and overwrites any manual deduction.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(product.id) {
            let discount = line
                .discount_percent
                .unwrap_or_else(|| coerce_discount(product.discount_percentage.as_ref()));
            line.discount_percent = Some(discount);
            line.quantity = line.quantity.saturating_add(1);
            line.deduction = line_deduction(line.unit_price, discount, line.quantity);
            tracing::debug!(
                product_id = product.id,
                quantity = line.quantity,
                deduction = %line.deduction,
                "Selection quantity incremented"
            );
            return;
        }

        let discount = coerce_discount(product.discount_percentage.as_ref());
        let line = SelectionLine {
            product_id: product.id,
            title: product.title.clone(),
            unit_price: product.price,
            quantity: 1,
            discount_percent: Some(discount),
            deduction: line_deduction(product.price, discount, 1),
        };
        tracing::debug!(
            product_id = product.id,
            deduction = %line.deduction,
            "Selection line added"
        );
        self.lines.push(line);
    }

    /// Remove one unit; the line disappears when its quantity reaches zero
    ///
    /// Unknown product ids are ignored.
    pub fn remove(&mut self, product_id: i64) {
        let Some(line) = self.line_mut(product_id) else {
            return;
        };

        if line.quantity <= 1 {
            self.lines.retain(|l| l.product_id != product_id);
            tracing::debug!(product_id, "Selection line removed");
            return;
        }

        line.quantity -= 1;
        Self::recompute(line);
    }

    /// Set the quantity from free text
    ///
    /// Anything other than a positive integer is ignored. Returns whether the
    /// line changed.
    pub fn set_quantity(&mut self, product_id: i64, raw: &str) -> bool {
        let Some(quantity) = parse_quantity(raw) else {
            tracing::debug!(product_id, raw = %raw, "Ignoring invalid quantity");
            return false;
        };
        let Some(line) = self.line_mut(product_id) else {
            return false;
        };

        line.quantity = quantity;
        Self::recompute(line);
        true
    }

    /// Override a line's deduction from free text; unparsable input stores 0
    ///
    /// Returns whether a line was found.
    pub fn set_deduction(&mut self, product_id: i64, raw: &str) -> bool {
        let Some(line) = self.line_mut(product_id) else {
            return false;
        };
        line.deduction = parse_deduction(raw);
        true
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Σ(unit price × quantity)
    pub fn gross_total(&self) -> Decimal {
        sum_amounts(self.lines.iter().map(SelectionLine::gross))
    }

    /// Σ(deduction)
    pub fn total_deduction(&self) -> Decimal {
        sum_amounts(self.lines.iter().map(|l| l.deduction))
    }

    /// Independent copy for the review screen
    pub fn snapshot(&self) -> CheckoutSnapshot {
        CheckoutSnapshot {
            lines: self.lines.clone(),
            gross_total: self.gross_total(),
            total_deduction: self.total_deduction(),
        }
    }

    fn recompute(line: &mut SelectionLine) {
        // Lines without a stored discount keep their deduction as is
        if let Some(discount) = line.discount_percent {
            line.deduction = line_deduction(line.unit_price, discount, line.quantity);
        }
    }
}
