//! Integration tests for rule loading and configuration
//!
//! Rule tables are data: a custom YAML file must be able to replace the
//! built-in hierarchy, partners, rates and column names end to end.

#[path = "../helpers/mod.rs"]
mod helpers;

use agent_commission::commissions::CalculationOptions;
use agent_commission::config::{AppConfig, Config};
use agent_commission::hierarchy::NodeKind;
use agent_commission::reports::ReportService;
use agent_commission::transactions::RawTable;
use agent_commission::{AppError, CommissionRules};
use helpers::*;
use rust_decimal_macros::dec;
use serde_json::json;
use std::path::PathBuf;

const CUSTOM_RULES: &str = r#"
nodes:
  - id: HQ
    rate: "0.10"
    label: Head office
  - id: HQ-EAST
    parent: HQ
    rate: "0.25"
partners:
  - name: Lotus
    rate: "0.15"
location_priority: [HQ-EAST, Lotus]
other_rate: "0.50"
unknown_location_label: nowhere
columns:
  location: Venue
  agent_code: Agent
  amount: Amount
  bonus: Bonus
"#;

fn write_rules(name: &str, yaml: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{}.yaml", name, std::process::id()));
    std::fs::write(&path, yaml).unwrap();
    path
}

fn config_for(path: PathBuf) -> Config {
    Config {
        app: AppConfig {
            env: "test".to_string(),
            log_level: "debug".to_string(),
            log_format: "text".to_string(),
        },
        calculation: CalculationOptions::default(),
        rules_path: Some(path),
    }
}

fn custom_table() -> RawTable {
    RawTable::new(
        vec!["Agent".into(), "Amount".into(), "Venue".into()],
        vec![
            vec![json!("IN-1"), json!(100), json!("HQ-EAST branch")],
            vec![json!("IN-2"), json!(40), json!("hq")],
            vec![json!("OUT-1"), json!(20), json!("Lotus")],
            vec![json!("IN-3"), json!(10), json!(null)],
        ],
    )
}

#[test]
fn test_builtin_rules_shape() {
    let rules = CommissionRules::default();

    let ids: Vec<&str> = rules.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["OC619", "OC619-01", "OC619-01-01", "OC619-01-01-01"]);
    assert_eq!(rules.nodes[1].rate, dec!(0.20));
    assert_eq!(rules.location_priority[0], "BELLA");
    assert_eq!(rules.unknown_location_label, "未知地点");
    assert!(rules.partners.iter().all(|p| p.rate == dec!(0.30)));
}

#[test]
fn test_custom_rules_from_file_drive_report() {
    let path = write_rules("custom-rules", CUSTOM_RULES);
    let service = ReportService::from_config(&config_for(path.clone())).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(service.hierarchy().len(), 2);

    let report = service.generate(&custom_table()).unwrap();

    // HQ-EAST: 100 × 25%; HQ: (0 + 100) × 10%, the lowercase "hq" is not a node
    assert_eq!(report.row("HQ-EAST").unwrap().commission_amount, dec!(25));
    assert_eq!(report.row("HQ").unwrap().commission_amount, dec!(10));
    assert_eq!(report.row("HQ").unwrap().level_label, "Level 1 (Head office)");

    assert_eq!(report.row("Lotus").unwrap().kind, NodeKind::Partner);
    assert_eq!(report.row("Lotus").unwrap().commission_amount, dec!(3));

    assert_eq!(report.row("hq").unwrap().kind, NodeKind::Other);
    assert_eq!(report.row("hq").unwrap().commission_amount, dec!(20));
    assert_eq!(report.row("nowhere").unwrap().commission_amount, dec!(5));

    // only the exact "Lotus" cell is ranked; the rest follow by agent type and number
    assert_eq!(report.records[0].location, "Lotus");
    assert_eq!(report.records[1].location, "HQ-EAST branch");
    assert_eq!(report.records[3].location, "nowhere");
}

#[test]
fn test_missing_rule_file_is_io_error() {
    let config = config_for(std::env::temp_dir().join("no-such-commission-rules.yaml"));

    let err = ReportService::from_config(&config).err().unwrap();
    assert!(matches!(err, AppError::Io(_)));
}

#[test]
fn test_malformed_yaml_is_yaml_error() {
    let err = CommissionRules::from_yaml_str("nodes: [oops").unwrap_err();
    assert!(matches!(err, AppError::Yaml(_)));
}

#[test]
fn test_rate_out_of_range_rejected() {
    let yaml = r#"
nodes:
  - id: A
    rate: "1.5"
other_rate: "0.3"
"#;

    let err = CommissionRules::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, AppError::Configuration(ref m) if m.contains("between 0 and 1")));
}

#[test]
fn test_duplicate_ids_rejected() {
    let yaml = r#"
nodes:
  - id: A
    rate: "0.1"
  - id: A
    rate: "0.2"
other_rate: "0.3"
"#;

    let err = CommissionRules::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, AppError::Configuration(ref m) if m.contains("Duplicate node id")));
}

#[test]
fn test_partner_clashing_with_node_rejected() {
    let yaml = r#"
nodes:
  - id: A
    rate: "0.1"
partners:
  - name: A
    rate: "0.3"
other_rate: "0.3"
"#;

    let err = CommissionRules::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, AppError::Configuration(_)));
}

#[test]
fn test_unknown_parent_rejected() {
    let yaml = r#"
nodes:
  - id: A-01
    parent: A
    rate: "0.1"
other_rate: "0.3"
"#;

    assert!(CommissionRules::from_yaml_str(yaml).is_err());
}

#[test]
fn test_rules_without_partners_resolve_to_other() {
    let rules = TestDataFactory::rules(SIBLING_LEAF_RULES);
    let service = ReportService::new(&rules, CalculationOptions::default()).unwrap();

    let report = service
        .generate(&RawTable::new(
            TestDataFactory::headers(),
            vec![TestDataFactory::raw_row("IN-1", json!(10), "BELLA")],
        ))
        .unwrap();

    assert_eq!(report.row("BELLA").unwrap().kind, NodeKind::Other);
    assert_eq!(report.row("BELLA").unwrap().commission_amount, dec!(3));
    assert_eq!(report.rows_of_kind(NodeKind::Hierarchy).count(), 4);
}
