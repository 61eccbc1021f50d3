//! Property-based tests for the selection and wallet rules.

use checkout_engine::{MemoryStore, PersistedState, SelectionAggregator, WalletLedger};
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::{DiscountInput, Product};
use std::sync::Arc;

// Strategies for generating test data
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000, 0u32..100).prop_map(|(units, cents)| Decimal::new(units * 100 + i64::from(cents), 2))
}

fn discount_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=10_000).prop_map(|basis| Decimal::new(i64::from(basis), 2))
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Remove,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(prop_oneof![Just(Op::Add), Just(Op::Remove)], 0..60)
}

// 每件先取整，再乘数量
fn expected_deduction(price: Decimal, discount: Decimal, quantity: u32) -> Decimal {
    let unit = (price * (Decimal::ONE_HUNDRED - discount) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    (unit * Decimal::from(quantity)).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn product(price: Decimal, discount: Decimal) -> Product {
    Product::new(1, "Product", price).with_discount(DiscountInput::Text(discount.to_string()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn quantity_tracks_adds_minus_removes(ops in ops_strategy()) {
        let p = product(Decimal::from(10), Decimal::ZERO);
        let mut selection = SelectionAggregator::new();
        let mut expected: i64 = 0;

        for op in ops {
            match op {
                Op::Add => {
                    selection.add(&p);
                    expected += 1;
                }
                Op::Remove => {
                    selection.remove(1);
                    expected = (expected - 1).max(0);
                }
            }
        }

        match selection.line(1) {
            Some(line) => prop_assert_eq!(i64::from(line.quantity), expected),
            None => prop_assert_eq!(expected, 0),
        }
    }

    #[test]
    fn deduction_follows_formula_after_quantity_change(
        price in price_strategy(),
        discount in discount_strategy(),
        adds in 1u32..20,
        quantity in 1u32..500,
    ) {
        let p = product(price, discount);
        let mut selection = SelectionAggregator::new();
        for _ in 0..adds {
            selection.add(&p);
        }
        prop_assert_eq!(
            selection.line(1).unwrap().deduction,
            expected_deduction(price, discount, adds)
        );

        prop_assert!(selection.set_quantity(1, &quantity.to_string()));
        prop_assert_eq!(
            selection.line(1).unwrap().deduction,
            expected_deduction(price, discount, quantity)
        );
    }

    #[test]
    fn deduction_follows_formula_after_removes(
        price in price_strategy(),
        discount in discount_strategy(),
        adds in 1u32..30,
        removes in 0u32..30,
    ) {
        let p = product(price, discount);
        let mut selection = SelectionAggregator::new();
        for _ in 0..adds {
            selection.add(&p);
        }
        for _ in 0..removes {
            selection.remove(1);
        }

        let left = adds.saturating_sub(removes);
        if left == 0 {
            prop_assert!(selection.line(1).is_none());
        } else {
            let line = selection.line(1).unwrap();
            prop_assert_eq!(line.quantity, left);
            prop_assert_eq!(line.deduction, expected_deduction(price, discount, left));
        }
    }

    #[test]
    fn manual_deduction_survives_until_quantity_change(
        price in price_strategy(),
        manual in 0u32..100_000,
    ) {
        let p = product(price, Decimal::ZERO);
        let mut selection = SelectionAggregator::new();
        selection.add(&p);
        selection.set_deduction(1, &manual.to_string());
        prop_assert_eq!(selection.total_deduction(), Decimal::from(manual));

        selection.add(&p);
        prop_assert_eq!(selection.line(1).unwrap().deduction, expected_deduction(price, Decimal::ZERO, 2));
    }

    #[test]
    fn insufficient_check_never_mutates(balance in 0u32..10_000, amount in 0u32..20_000) {
        let store = Arc::new(MemoryStore::with_entries([("wallet_balance", balance.to_string())]));
        let ledger = WalletLedger::new(PersistedState::new(store.clone()));
        let amount = Decimal::from(amount);

        prop_assert_eq!(ledger.sufficient_for(amount), amount <= Decimal::from(balance));
        prop_assert_eq!(ledger.read_balance(), Decimal::from(balance));
    }
}
