//! Property-based tests for the ledger arithmetic.
//!
//! These use proptest to verify the aggregation and progress invariants
//! across a wide range of inputs.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rrc_ops_api::{
    entities::{ledger_transaction, TransactionType},
    services::ledger::{fold_totals, percent_of_target},
};
use rust_decimal::Decimal;

fn tx_type_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Purchase),
        Just(TransactionType::Sale),
        Just(TransactionType::Adjustment),
    ]
}

fn row_strategy() -> impl Strategy<Value = (TransactionType, i64, i64)> {
    (tx_type_strategy(), 0i64..1_000_000, 0i64..1_000_000)
}

fn model(id: i64, tx_type: TransactionType, quantity: i64, value: i64) -> ledger_transaction::Model {
    ledger_transaction::Model {
        id,
        sheet_id: 1,
        date: NaiveDate::from_ymd_opt(2025, 10, 15).unwrap(),
        tx_type: tx_type.as_str().to_string(),
        item: "Granules".to_string(),
        quantity: Decimal::from(quantity),
        value: Decimal::from(value),
        created_by: 1,
        notes: None,
        created_at: Utc::now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Aggregate sums equal the manual sum over the transaction set, per
    // type, exactly (no rounding drift for integer quantities).
    #[test]
    fn fold_matches_manual_sum(rows in prop::collection::vec(row_strategy(), 0..50)) {
        let models: Vec<_> = rows
            .iter()
            .enumerate()
            .map(|(i, (t, q, v))| model(i as i64 + 1, *t, *q, *v))
            .collect();

        let totals = fold_totals(&models);

        for tx_type in [TransactionType::Purchase, TransactionType::Sale, TransactionType::Adjustment] {
            let manual_qty: i64 = rows.iter().filter(|(t, _, _)| *t == tx_type).map(|(_, q, _)| q).sum();
            let manual_val: i64 = rows.iter().filter(|(t, _, _)| *t == tx_type).map(|(_, _, v)| v).sum();
            let entry = totals.get(&tx_type).copied().unwrap_or_default();
            prop_assert_eq!(entry.quantity, Decimal::from(manual_qty));
            prop_assert_eq!(entry.value, Decimal::from(manual_val));
        }
    }

    // Types never observed must not appear in the aggregate at all.
    #[test]
    fn fold_has_no_phantom_types(rows in prop::collection::vec((0i64..1000, 0i64..1000), 0..20)) {
        let models: Vec<_> = rows
            .iter()
            .enumerate()
            .map(|(i, (q, v))| model(i as i64 + 1, TransactionType::Sale, *q, *v))
            .collect();

        let totals = fold_totals(&models);
        prop_assert!(!totals.contains_key(&TransactionType::Purchase));
        prop_assert!(!totals.contains_key(&TransactionType::Adjustment));
    }
}

proptest! {
    #[test]
    fn percent_is_always_clamped(sold in 0i64..10_000_000, target in 0i64..10_000_000) {
        let pct = percent_of_target(Decimal::from(sold), Decimal::from(target));
        prop_assert!(pct <= 100);
    }

    #[test]
    fn percent_with_zero_target_is_zero(sold in 0i64..10_000_000) {
        prop_assert_eq!(percent_of_target(Decimal::from(sold), Decimal::ZERO), 0);
    }

    // Progress is monotonically non-decreasing in sold quantity for a fixed
    // positive target.
    #[test]
    fn percent_is_monotonic_in_sold(sold in 0i64..1_000_000, extra in 0i64..1_000_000, target in 1i64..1_000_000) {
        let base = percent_of_target(Decimal::from(sold), Decimal::from(target));
        let more = percent_of_target(Decimal::from(sold + extra), Decimal::from(target));
        prop_assert!(more >= base);
    }

    // Meeting the target exactly always reads 100%.
    #[test]
    fn percent_at_target_is_complete(target in 1i64..1_000_000) {
        prop_assert_eq!(percent_of_target(Decimal::from(target), Decimal::from(target)), 100);
    }
}
