//! Wallet ledger - single persisted balance
//!
//! Reads never write: when nothing valid is persisted the seed balance is
//! reported but not stored. The first successful debit is what materialises
//! the balance in storage.
//!
//! Debits are final. There is no rollback path, and callers must make sure a
//! completed payment debits at most once (see `session`).

use crate::store::PersistedState;
use rust_decimal::prelude::*;

/// Balance reported before anything has been persisted
pub const DEFAULT_SEED_BALANCE: Decimal = Decimal::from_parts(2400, 0, 0, false, 0);

/// Persisted wallet balance
#[derive(Clone)]
pub struct WalletLedger {
    state: PersistedState,
    seed: Decimal,
}

impl WalletLedger {
    pub fn new(state: PersistedState) -> Self {
        Self::with_seed(state, DEFAULT_SEED_BALANCE)
    }

    pub fn with_seed(state: PersistedState, seed: Decimal) -> Self {
        Self { state, seed }
    }

    /// Seed balance used when nothing valid is persisted
    pub fn seed(&self) -> Decimal {
        self.seed
    }

    /// Current balance
    ///
    /// Absent, unreadable, non-numeric or negative values all fall back to
    /// the seed, without persisting it.
    pub fn read_balance(&self) -> Decimal {
        self.persisted_balance().unwrap_or(self.seed)
    }

    /// Whether a valid balance is stored
    pub fn is_materialized(&self) -> bool {
        self.persisted_balance().is_some()
    }

    fn persisted_balance(&self) -> Option<Decimal> {
        let raw = self.state.wallet_balance()?;
        let balance = parse_balance(&raw);
        if balance.is_none() {
            tracing::debug!(raw = %raw, "Ignoring invalid persisted wallet balance");
        }
        balance
    }

    /// `amount <= balance`
    pub fn sufficient_for(&self, amount: Decimal) -> bool {
        amount <= self.read_balance()
    }

    /// Subtract `amount`, flooring at zero, and persist the result
    ///
    /// Returns the new balance. When the store rejects the write the ledger
    /// goes stale silently; the returned value is still what was computed.
    pub fn debit(&self, amount: Decimal) -> Decimal {
        let previous = self.read_balance();
        let next = previous.saturating_sub(amount).max(Decimal::ZERO);

        if !self.state.set_wallet_balance(&next.normalize().to_string()) {
            tracing::warn!(
                previous = %previous,
                amount = %amount,
                "Wallet debit not persisted, balance is stale"
            );
        } else {
            tracing::info!(previous = %previous, amount = %amount, balance = %next, "Wallet debited");
        }

        next
    }
}

/// Finite, non-negative number
fn parse_balance(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .and_then(Decimal::from_f64)
        })
        .filter(|balance| !balance.is_sign_negative())
}
