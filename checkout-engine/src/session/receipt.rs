//! Receipt hand-off
//!
//! A confirmed session packages a [`Receipt`] for whatever surface shows it
//! (a [`ReceiptSink`]). If that surface cannot take it, the session falls
//! back to a flat-text [`ReceiptArtifact`] the shopper can keep as a file.

use crate::money::format_amount;
use shared::CheckoutSnapshot;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default line width for rendered receipts
pub const RECEIPT_WIDTH: usize = 48;

#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("Receipt surface unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the receipt view needs
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub snapshot: CheckoutSnapshot,
    pub reference: String,
    pub date: String,
    pub customer_label: String,
}

/// Surface that presents a receipt
pub trait ReceiptSink {
    fn present(&mut self, receipt: &Receipt) -> Result<(), ReceiptError>;
}

/// Outcome of handing a receipt to a sink
#[derive(Debug, Clone, PartialEq)]
pub enum Handoff {
    Presented,
    /// The sink failed; this artifact stands in for it
    Fallback(ReceiptArtifact),
}

/// Flat-text receipt, downloadable as `receipt-{reference}.txt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptArtifact {
    pub file_name: String,
    pub content: String,
}

impl ReceiptArtifact {
    /// Five lines: banner, reference, date, amount, customer
    pub fn from_receipt(receipt: &Receipt, currency: &str) -> Self {
        let lines = [
            "Payment Successful".to_string(),
            format!("Ref Number: {}", receipt.reference),
            format!("Date: {}", receipt.date),
            format!(
                "Amount: {}",
                format_amount(receipt.snapshot.total_deduction, currency)
            ),
            format!("Customer: {}", receipt.customer_label),
        ];

        Self {
            file_name: format!("receipt-{}.txt", receipt.reference),
            content: lines.join("\n"),
        }
    }

    /// Write into `dir` (created if missing) and return the file path
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ReceiptError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.content)?;
        tracing::info!(path = %path.display(), "Receipt artifact saved");
        Ok(path)
    }
}

/// Plain-text line builder
struct TextBuilder {
    buf: String,
    width: usize,
}

impl TextBuilder {
    fn new(width: usize) -> Self {
        Self {
            buf: String::new(),
            width,
        }
    }

    fn write_line(&mut self, s: &str) {
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    fn eq_sep(&mut self) {
        self.write_line(&"=".repeat(self.width));
    }

    fn dash_sep(&mut self) {
        self.write_line(&"-".repeat(self.width));
    }

    fn text_center(&mut self, s: &str) {
        let len = s.chars().count();
        let pad = self.width.saturating_sub(len) / 2;
        self.write_line(&format!("{}{}", " ".repeat(pad), s));
    }

    /// Left-aligned key, right-aligned value
    fn line_lr(&mut self, left: &str, right: &str) {
        let lw = left.chars().count();
        let rw = right.chars().count();
        if lw + rw >= self.width {
            self.write_line(&format!("{} {}", left, right));
        } else {
            let spaces = self.width - lw - rw;
            self.write_line(&format!("{}{}{}", left, " ".repeat(spaces), right));
        }
    }

    fn finalize(self) -> String {
        self.buf
    }
}

/// Renders a full receipt as monospaced text
pub struct ReceiptRenderer<'a> {
    receipt: &'a Receipt,
    currency: &'a str,
    width: usize,
}

impl<'a> ReceiptRenderer<'a> {
    pub fn new(receipt: &'a Receipt, currency: &'a str, width: usize) -> Self {
        Self {
            receipt,
            currency,
            width,
        }
    }

    pub fn render(&self) -> String {
        let mut b = TextBuilder::new(self.width);
        b.text_center("PAYMENT RECEIPT");
        b.eq_sep();
        b.line_lr("Ref Number", &self.receipt.reference);
        b.line_lr("Date", &self.receipt.date);
        b.line_lr("Customer", &self.receipt.customer_label);
        b.dash_sep();

        for line in &self.receipt.snapshot.lines {
            b.write_line(&line.title);
            let detail = format!(
                "  {} x {}",
                line.quantity,
                format_amount(line.unit_price, "")
            );
            b.line_lr(&detail, &format_amount(line.deduction, self.currency));
        }

        b.eq_sep();
        b.line_lr(
            "Gross total",
            &format_amount(self.receipt.snapshot.gross_total, self.currency),
        );
        b.line_lr(
            "Amount paid",
            &format_amount(self.receipt.snapshot.total_deduction, self.currency),
        );
        b.finalize()
    }
}

/// Sink that writes the rendered receipt to any writer (stdout, a file)
pub struct TextReceiptSink<W: Write> {
    out: W,
    currency: String,
    width: usize,
}

impl<W: Write> TextReceiptSink<W> {
    pub fn new(out: W, currency: impl Into<String>) -> Self {
        Self {
            out,
            currency: currency.into(),
            width: RECEIPT_WIDTH,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReceiptSink for TextReceiptSink<W> {
    fn present(&mut self, receipt: &Receipt) -> Result<(), ReceiptError> {
        let text = ReceiptRenderer::new(receipt, &self.currency, self.width).render();
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
