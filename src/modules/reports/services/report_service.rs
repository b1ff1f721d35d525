use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{CommissionRules, Config};
use crate::core::{AppError, Result};
use crate::modules::commissions::models::CalculationOptions;
use crate::modules::commissions::services::{Aggregator, CommissionCalculator};
use crate::modules::hierarchy::models::AgentHierarchy;
use crate::modules::hierarchy::services::HierarchyResolver;
use crate::modules::reports::models::CommissionReport;
use crate::modules::reports::services::ResultAssembler;
use crate::modules::transactions::models::{AmountIssue, RawTable, TransactionRecord};
use crate::modules::transactions::services::{RecordNormalizer, SortKeyGenerator};

/// Runs the whole commission pipeline for one batch
///
/// Holds only read-only rule state, so one service can serve any number of
/// batches; every call builds its own records and derived totals.
pub struct ReportService {
    hierarchy: AgentHierarchy,
    resolver: HierarchyResolver,
    normalizer: RecordNormalizer,
    sorter: SortKeyGenerator,
    options: CalculationOptions,
}

impl ReportService {
    /// Create a report service from validated rules
    pub fn new(rules: &CommissionRules, options: CalculationOptions) -> Result<Self> {
        let hierarchy = AgentHierarchy::from_rules(rules)?;
        let resolver = HierarchyResolver::new(&hierarchy);

        Ok(Self {
            resolver,
            hierarchy,
            normalizer: RecordNormalizer::new(
                rules.columns.clone(),
                rules.unknown_location_label.clone(),
            ),
            sorter: SortKeyGenerator::new(rules.location_priority.iter().cloned()),
            options,
        })
    }

    /// Create a report service from environment configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let rules = config.load_rules()?;
        Self::new(&rules, config.calculation)
    }

    pub fn hierarchy(&self) -> &AgentHierarchy {
        &self.hierarchy
    }

    pub fn options(&self) -> &CalculationOptions {
        &self.options
    }

    /// Generate the commission report for a raw table
    ///
    /// # Errors
    /// `MissingRequiredColumn` if the location or amount header is absent,
    /// `EmptyInput` if the table has no usable rows, `Validation` if the
    /// commissions leave the decimal range.
    pub fn generate(&self, table: &RawTable) -> Result<CommissionReport> {
        let batch = self.normalizer.normalize(table)?;
        self.build_report(batch.records, batch.amount_issues)
    }

    /// Generate the report for records already normalized by the caller
    pub fn generate_from_records(
        &self,
        records: Vec<TransactionRecord>,
    ) -> Result<CommissionReport> {
        self.build_report(records, Vec::new())
    }

    fn build_report(
        &self,
        records: Vec<TransactionRecord>,
        mut amount_issues: Vec<AmountIssue>,
    ) -> Result<CommissionReport> {
        if records.is_empty() {
            warn!("Refusing to build a commission report for an empty batch");
            return Err(AppError::EmptyInput);
        }

        let records = self.sorter.sort(records);
        let aggregation = Aggregator::new(self.options.gating).aggregate(&records, &self.resolver);
        let commissions =
            CommissionCalculator::new(self.options).calculate(&self.hierarchy, &aggregation)?;

        let assembler = ResultAssembler::new(self.options.precision);
        let rows = assembler.assemble(&self.hierarchy, &aggregation, &commissions);
        let summary = assembler.summarize(&aggregation, &commissions)?;
        let rules = assembler.describe_rules(&self.hierarchy, &self.options);

        amount_issues.extend(aggregation.amount_issues.iter().cloned());
        amount_issues.sort_by_key(|issue| issue.row_index);

        let report = CommissionReport {
            batch_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            options: self.options,
            records,
            rows,
            summary,
            rules,
            amount_issues,
        };

        info!(
            "Commission report {} generated: {} rows, total amount {}, total commission {}",
            report.batch_id,
            report.rows.len(),
            report.summary.total_amount,
            report.summary.total_commission
        );

        Ok(report)
    }
}
