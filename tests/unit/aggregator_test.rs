// Aggregation tests
//
// - Sum of node totals equals the sum of input amounts (conservation)
// - Positive / negative split, zero amounts only in the total
// - Null amounts counted but never summed
// - Both gating policies exposed

#[path = "../helpers/mod.rs"]
mod helpers;

use agent_commission::commissions::{Aggregator, GatingPolicy};
use agent_commission::hierarchy::{HierarchyResolver, NodeKind};
use agent_commission::transactions::TransactionRecord;
use helpers::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn resolver() -> HierarchyResolver {
    HierarchyResolver::new(&TestDataFactory::default_hierarchy())
}

#[test]
fn test_sign_split_and_zero_amounts() {
    let records = TestDataFactory::records(&[
        ("OC619-01", dec!(120)),
        ("OC619-01", dec!(-30)),
        ("OC619-01", dec!(0)),
    ]);

    let result = Aggregator::default().aggregate(&records, &resolver());
    let totals = result.get("OC619-01").unwrap();

    assert_eq!(totals.total_amount, dec!(90));
    assert_eq!(totals.positive_amount, dec!(120));
    assert_eq!(totals.negative_amount, dec!(-30));
    assert_eq!(totals.transaction_count, 3);
    assert_eq!(totals.effective_amount, dec!(90));
}

#[test]
fn test_all_negative_node_gated_to_zero() {
    let records = TestDataFactory::records(&[("OC619", dec!(-10)), ("OC619", dec!(-5))]);

    let total_sign = Aggregator::new(GatingPolicy::TotalSign).aggregate(&records, &resolver());
    let positive_only =
        Aggregator::new(GatingPolicy::PositiveOnly).aggregate(&records, &resolver());

    assert_eq!(total_sign.effective_amount("OC619"), Decimal::ZERO);
    assert_eq!(positive_only.effective_amount("OC619"), Decimal::ZERO);
    assert_eq!(total_sign.get("OC619").unwrap().total_amount, dec!(-15));
}

#[test]
fn test_mixed_signs_differ_by_policy() {
    let records = TestDataFactory::records(&[("WS", dec!(80)), ("WS", dec!(-100))]);

    let total_sign = Aggregator::new(GatingPolicy::TotalSign).aggregate(&records, &resolver());
    let positive_only =
        Aggregator::new(GatingPolicy::PositiveOnly).aggregate(&records, &resolver());

    assert_eq!(total_sign.effective_amount("WS"), dec!(0));
    assert_eq!(positive_only.effective_amount("WS"), dec!(80));
    // both quantities stay available whichever policy aggregated
    let totals = total_sign.get("WS").unwrap();
    assert_eq!(totals.gated_amount(GatingPolicy::PositiveOnly), dec!(80));
}

#[test]
fn test_null_amounts_only_counted() {
    let records = vec![
        TransactionRecord::new("BELLA", Some("IN-1".to_string()), None, 1),
        TransactionRecord::new("BELLA", Some("OUT-1".to_string()), Some(dec!(7)), 2),
    ];

    let result = Aggregator::default().aggregate(&records, &resolver());
    let bella = result.get("BELLA").unwrap();

    assert_eq!(bella.kind, NodeKind::Partner);
    assert_eq!(bella.transaction_count, 2);
    assert_eq!(bella.amount_count, 1);
    assert_eq!(bella.in_count, 1);
    assert_eq!(bella.out_count, 1);
    assert_eq!(bella.total_amount, dec!(7));
}

#[test]
fn test_each_other_location_gets_own_bucket() {
    let records = TestDataFactory::records(&[("Harbour", dec!(1)), ("Dock", dec!(2))]);
    let result = Aggregator::default().aggregate(&records, &resolver());

    assert_eq!(result.of_kind(NodeKind::Other).count(), 2);
    assert_amount_conserved(&records, &result);
}

#[test]
fn test_only_present_nodes_aggregated() {
    let records = TestDataFactory::records(&[("OC619-01-01", dec!(5))]);
    let result = Aggregator::default().aggregate(&records, &resolver());

    assert_eq!(result.len(), 1);
    assert!(result.get("OC619").is_none());
}

fn arb_amount() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::weighted(0.9, (-100_000i64..100_000i64).prop_map(|c| Decimal::new(c, 2)))
}

proptest! {
    /// Sum of all node totals equals the sum of all input amounts
    #[test]
    fn prop_amount_conservation(
        rows in prop::collection::vec(
            (
                prop::sample::select(vec![
                    "OC619", "OC619-01", "OC619-01-01", "OC619-01-01-01",
                    "BELLA", "WS", "肥子代理 638", "Harbour", "Dock", "",
                ]),
                arb_amount(),
            ),
            1..60,
        )
    ) {
        let records: Vec<TransactionRecord> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (loc, amount))| TransactionRecord::new(loc, None, amount, i + 1))
            .collect();

        let result = Aggregator::default().aggregate(&records, &resolver());

        prop_assert_eq!(result.grand_total(), input_total(&records));
        prop_assert_eq!(result.transaction_count(), records.len());
        for totals in result.iter() {
            prop_assert_eq!(totals.positive_amount + totals.negative_amount, totals.total_amount);
            prop_assert!(totals.effective_amount >= Decimal::ZERO);
        }
    }
}
