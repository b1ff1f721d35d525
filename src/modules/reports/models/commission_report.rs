use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::commissions::models::CalculationOptions;
use crate::modules::hierarchy::models::NodeKind;
use crate::modules::transactions::models::{AmountIssue, TransactionRecord};

/// One line of the commission report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub node_id: String,
    pub kind: NodeKind,
    /// e.g. "Level 2 (Senior agent)", "Partner", "Other"
    pub level_label: String,
    pub transaction_count: usize,
    pub total_amount: Decimal,
    pub positive_amount: Decimal,
    pub negative_amount: Decimal,
    pub effective_amount: Decimal,
    pub average_amount: Option<Decimal>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub bonus_total: Decimal,
    /// Amount the rate was applied to
    pub base_amount: Decimal,
    pub rate: Decimal,
    /// Rate rendered as a percentage, e.g. "20%"
    pub rate_label: String,
    pub commission_amount: Decimal,
    pub explanation: String,
}

/// Batch-wide figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Sum of every input amount
    pub total_amount: Decimal,
    pub total_commission: Decimal,
    pub node_count: usize,
    pub transaction_count: usize,
}

/// Everything the report-building collaborator needs for one batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionReport {
    pub batch_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub options: CalculationOptions,
    /// Input records in sort-key order
    pub records: Vec<TransactionRecord>,
    /// Rows in display order: hierarchy levels top-down, then partners, then other
    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
    /// Human-readable rule lines for the rules sheet
    pub rules: Vec<String>,
    pub amount_issues: Vec<AmountIssue>,
}

impl CommissionReport {
    /// First `n` sorted records
    pub fn preview(&self, n: usize) -> &[TransactionRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn row(&self, node_id: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.node_id == node_id)
    }

    /// Rows of one kind, in display order
    pub fn rows_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(move |r| r.kind == kind)
    }
}
