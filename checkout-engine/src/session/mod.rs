//! Checkout session - review, payment and receipt
//!
//! A [`CheckoutSession`] is created when the shopper leaves the catalog for
//! review and lives only in memory. It owns the selection snapshot, the
//! payment record and the verification pad.
//!
//! # State machine
//!
//! ```text
//! Reviewing ──Insufficient──▶ InsufficientFunds ──Dismiss──▶ Reviewing
//! Reviewing ──Debit─────────▶ Paid ──ToReceipt──▶ ReceiptReady
//! ```
//!
//! The wallet is debited only on the `Reviewing → Paid` edge, so a session
//! debits at most once. Attempting payment again after that is answered
//! with [`PaymentOutcome::AlreadyPaid`] and only re-opens the confirmation.

pub mod receipt;
pub mod verification;

pub use receipt::{
    Handoff, Receipt, ReceiptArtifact, ReceiptError, ReceiptRenderer, ReceiptSink, TextReceiptSink,
};
pub use verification::{CODE_LENGTH, VerificationPad};

use crate::wallet::WalletLedger;
use rust_decimal::Decimal;
use shared::util::{payment_reference, today_long};
use shared::{CheckoutSnapshot, PaymentRecord, PaymentStatus};
use std::fmt;
use thiserror::Error;

/// Where a session is in the payment flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Reviewing,
    InsufficientFunds,
    Paid,
    ReceiptReady,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Reviewing => "reviewing",
            SessionState::InsufficientFunds => "insufficient funds",
            SessionState::Paid => "paid",
            SessionState::ReceiptReady => "receipt ready",
        };
        f.write_str(name)
    }
}

/// Inputs that move a session between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Payment attempted with too little balance
    Insufficient,
    /// Payment attempted with enough balance
    Debit,
    Dismiss,
    ToReceipt,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionEvent::Insufficient => "insufficient",
            SessionEvent::Debit => "debit",
            SessionEvent::Dismiss => "dismiss",
            SessionEvent::ToReceipt => "to receipt",
        };
        f.write_str(name)
    }
}

impl SessionState {
    /// Transition table; `None` marks an illegal transition
    pub fn next(self, event: SessionEvent) -> Option<SessionState> {
        use SessionEvent as E;
        use SessionState as S;

        match (self, event) {
            (S::Reviewing, E::Insufficient) => Some(S::InsufficientFunds),
            (S::Reviewing, E::Debit) => Some(S::Paid),
            (S::InsufficientFunds, E::Dismiss) => Some(S::Reviewing),
            (S::Paid, E::ToReceipt) | (S::ReceiptReady, E::ToReceipt) => Some(S::ReceiptReady),
            _ => None,
        }
    }

    /// The wallet has been debited for this session
    pub fn is_payment_processed(self) -> bool {
        matches!(self, SessionState::Paid | SessionState::ReceiptReady)
    }
}

/// Session errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Selection is empty")]
    EmptySelection,

    #[error("No active checkout session")]
    NoSession,

    #[error("Verification code incomplete")]
    VerificationIncomplete,

    #[error("Illegal transition: {event} while {from}")]
    IllegalTransition {
        from: SessionState,
        event: SessionEvent,
    },
}

/// Result of [`CheckoutSession::attempt_payment`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Wallet debited; `balance` is the new balance
    Confirmed { balance: Decimal },
    /// Nothing debited
    InsufficientFunds { balance: Decimal, required: Decimal },
    /// Debited earlier in this session; nothing debited now
    AlreadyPaid,
}

/// Transient review-to-receipt bundle
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    snapshot: CheckoutSnapshot,
    record: PaymentRecord,
    state: SessionState,
    pad: VerificationPad,
    confirmation_open: bool,
}

impl CheckoutSession {
    /// Start reviewing `snapshot`
    ///
    /// Reference and date are generated here and never again. An empty
    /// snapshot is rejected before anything is generated; the caller should
    /// send the shopper back to browsing.
    pub fn initialize(
        snapshot: CheckoutSnapshot,
        customer_label: impl Into<String>,
    ) -> Result<Self, SessionError> {
        if snapshot.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        Self::initialize_with(snapshot, customer_label, payment_reference(), today_long())
    }

    /// Like [`initialize`](Self::initialize) with a fixed reference and date
    pub fn initialize_with(
        snapshot: CheckoutSnapshot,
        customer_label: impl Into<String>,
        reference: impl Into<String>,
        date: impl Into<String>,
    ) -> Result<Self, SessionError> {
        if snapshot.is_empty() {
            return Err(SessionError::EmptySelection);
        }

        let record = PaymentRecord::new(reference, date, customer_label);
        tracing::debug!(
            reference = %record.reference,
            lines = snapshot.lines.len(),
            total = %snapshot.total_deduction,
            "Checkout session started"
        );

        Ok(Self {
            snapshot,
            record,
            state: SessionState::Reviewing,
            pad: VerificationPad::new(),
            confirmation_open: false,
        })
    }

    pub fn snapshot(&self) -> &CheckoutSnapshot {
        &self.snapshot
    }

    pub fn record(&self) -> &PaymentRecord {
        &self.record
    }

    pub fn reference(&self) -> &str {
        &self.record.reference
    }

    pub fn date(&self) -> &str {
        &self.record.date
    }

    pub fn customer_label(&self) -> &str {
        &self.record.customer_label
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Amount that will be debited
    pub fn total(&self) -> Decimal {
        self.snapshot.total_deduction
    }

    pub fn pad(&self) -> &VerificationPad {
        &self.pad
    }

    pub fn pad_mut(&mut self) -> &mut VerificationPad {
        &mut self.pad
    }

    pub fn is_payment_processed(&self) -> bool {
        self.state.is_payment_processed()
    }

    /// Whether the payment confirmation view is showing
    pub fn is_confirmation_open(&self) -> bool {
        self.confirmation_open
    }

    fn transition(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        let next = self
            .state
            .next(event)
            .ok_or(SessionError::IllegalTransition {
                from: self.state,
                event,
            })?;
        tracing::debug!(from = %self.state, to = %next, event = %event, "Session transition");
        self.state = next;
        Ok(())
    }

    /// Pay the snapshot total from `wallet`
    ///
    /// Requires a complete verification pad. While the insufficient-funds
    /// notice is up the shopper must dismiss it first.
    pub fn attempt_payment(&mut self, wallet: &WalletLedger) -> Result<PaymentOutcome, SessionError> {
        if self.is_payment_processed() {
            self.confirmation_open = true;
            tracing::debug!(reference = %self.record.reference, "Payment already processed");
            return Ok(PaymentOutcome::AlreadyPaid);
        }
        if self.state != SessionState::Reviewing {
            return Err(SessionError::IllegalTransition {
                from: self.state,
                event: SessionEvent::Debit,
            });
        }
        if !self.pad.is_complete() {
            return Err(SessionError::VerificationIncomplete);
        }

        let required = self.total();
        let balance = wallet.read_balance();
        if !wallet.sufficient_for(required) {
            self.transition(SessionEvent::Insufficient)?;
            self.record.status = PaymentStatus::Insufficient;
            tracing::info!(
                reference = %self.record.reference,
                balance = %balance,
                required = %required,
                "Payment declined: insufficient funds"
            );
            return Ok(PaymentOutcome::InsufficientFunds { balance, required });
        }

        self.transition(SessionEvent::Debit)?;
        let balance = wallet.debit(required);
        self.record.status = PaymentStatus::Confirmed;
        self.record.verification_code = self.pad.code();
        self.confirmation_open = true;
        tracing::info!(
            reference = %self.record.reference,
            amount = %required,
            balance = %balance,
            "Payment confirmed"
        );

        Ok(PaymentOutcome::Confirmed { balance })
    }

    /// Back to reviewing after an insufficient-funds notice
    pub fn dismiss_insufficient_funds(&mut self) -> Result<(), SessionError> {
        self.transition(SessionEvent::Dismiss)
    }

    pub fn close_confirmation(&mut self) {
        self.confirmation_open = false;
    }

    /// Package the receipt; only valid once paid
    pub fn to_receipt(&mut self) -> Result<Receipt, SessionError> {
        self.transition(SessionEvent::ToReceipt)?;
        Ok(Receipt {
            snapshot: self.snapshot.clone(),
            reference: self.record.reference.clone(),
            date: self.record.date.clone(),
            customer_label: self.record.customer_label.clone(),
        })
    }

    /// Give the receipt to `sink`, falling back to a text artifact if it
    /// cannot take it
    pub fn hand_off_receipt(
        &mut self,
        sink: &mut dyn ReceiptSink,
        currency: &str,
    ) -> Result<Handoff, SessionError> {
        let receipt = self.to_receipt()?;
        match sink.present(&receipt) {
            Ok(()) => Ok(Handoff::Presented),
            Err(e) => {
                tracing::warn!(
                    reference = %receipt.reference,
                    error = %e,
                    "Receipt surface failed, producing text artifact"
                );
                Ok(Handoff::Fallback(ReceiptArtifact::from_receipt(
                    &receipt, currency,
                )))
            }
        }
    }
}
