// Sort key ordering tests
//
// - Agent type rank: IN before OUT before everything else
// - Agent number: first run of digits, 0 when absent
// - Sorting is a deterministic, stable total order

use agent_commission::transactions::services::{extract_agent_number, UNRANKED_LOCATION};
use agent_commission::transactions::{AgentType, SortKeyGenerator, TransactionRecord};
use proptest::prelude::*;

fn record(location: &str, agent: Option<&str>, row_index: usize) -> TransactionRecord {
    TransactionRecord::new(location, agent.map(String::from), None, row_index)
}

fn generator() -> SortKeyGenerator {
    SortKeyGenerator::new(["BELLA", "肥子代理 638", "OC619-01-01", "WS", "OC619-01-01-01"])
}

#[test]
fn test_out_agent_code_components() {
    let key = generator().key(&record("WS", Some("OUT-07"), 1));
    assert_eq!(key.agent_type_rank, 2);
    assert_eq!(key.agent_number, 7);
}

#[test]
fn test_in_agent_code_components() {
    let key = generator().key(&record("WS", Some("IN12B"), 1));
    assert_eq!(key.agent_type_rank, 1);
    assert_eq!(key.agent_number, 12);
}

#[test]
fn test_missing_agent_and_location_never_fail() {
    let key = generator().key(&record("", None, 1));
    assert_eq!(key.location_rank, UNRANKED_LOCATION);
    assert_eq!(key.agent_type_rank, AgentType::Other.rank());
    assert_eq!(key.agent_number, 0);
    assert_eq!(key.agent, "");
}

#[test]
fn test_known_locations_precede_unknown() {
    let g = generator();
    assert_eq!(g.location_rank("BELLA"), 1);
    assert_eq!(g.location_rank("OC619-01-01-01"), 5);
    assert!(g.location_rank("OC619") > g.location_rank("OC619-01-01-01"));
}

#[test]
fn test_full_ordering() {
    let sorted = generator().sort(vec![
        record("Harbour", Some("IN-1"), 1),
        record("WS", Some("X-3"), 2),
        record("WS", Some("OUT-1"), 3),
        record("WS", Some("IN-20"), 4),
        record("WS", Some("IN-3"), 5),
        record("BELLA", Some("OUT-9"), 6),
        record("Anchor", Some("IN-1"), 7),
    ]);

    let rows: Vec<usize> = sorted.iter().map(|r| r.row_index).collect();
    // BELLA first, then WS by type/number, then unknown locations by name
    assert_eq!(rows, vec![6, 5, 4, 3, 2, 7, 1]);
}

#[test]
fn test_agent_number_extraction_cases() {
    assert_eq!(extract_agent_number("代理 638"), 638);
    assert_eq!(extract_agent_number("  007 "), 7);
    assert_eq!(extract_agent_number("IN"), 0);
}

fn arb_record() -> impl Strategy<Value = (String, Option<String>)> {
    (
        prop::sample::select(vec!["BELLA", "WS", "OC619", "OC619-01-01", "Harbour", ""]),
        prop::option::of("(IN|OUT|X)?-?[0-9]{0,3}[A-Z]?"),
    )
        .prop_map(|(loc, agent)| (loc.to_string(), agent))
}

proptest! {
    /// Sorting an already sorted batch changes nothing
    #[test]
    fn prop_sort_is_idempotent(rows in prop::collection::vec(arb_record(), 0..40)) {
        let g = generator();
        let records: Vec<TransactionRecord> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (loc, agent))| TransactionRecord::new(loc, agent, None, i + 1))
            .collect();

        let once = g.sort(records);
        let twice = g.sort(once.clone());
        prop_assert_eq!(once, twice);
    }

    /// Keys never decrease along the sorted output, and ties keep input order
    #[test]
    fn prop_sorted_keys_are_monotonic(rows in prop::collection::vec(arb_record(), 0..40)) {
        let g = generator();
        let records: Vec<TransactionRecord> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (loc, agent))| TransactionRecord::new(loc, agent, None, i + 1))
            .collect();

        let sorted = g.sort(records);
        for pair in sorted.windows(2) {
            let (a, b) = (g.key(&pair[0]), g.key(&pair[1]));
            prop_assert!(a <= b);
            if a == b {
                prop_assert!(pair[0].row_index < pair[1].row_index);
            }
        }
    }
}
