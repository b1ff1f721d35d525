use rust_decimal::Decimal;

use crate::core::amount::format_rate;
use crate::core::Result;
use crate::modules::commissions::models::{
    AggregationResult, CalculationOptions, CascadeMode, CommissionResult, CommissionSet,
    LeafDistribution, LocationTotals,
};
use crate::modules::hierarchy::models::{AgentHierarchy, NodeKind};
use crate::modules::reports::models::{ReportRow, ReportSummary};

/// Zips aggregation and commission results into report rows
pub struct ResultAssembler {
    precision: u32,
}

impl ResultAssembler {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    /// Rows in display order: hierarchy by level, partners in rule order, other buckets by id
    pub fn assemble(
        &self,
        hierarchy: &AgentHierarchy,
        aggregation: &AggregationResult,
        commissions: &CommissionSet,
    ) -> Vec<ReportRow> {
        let mut rows = Vec::with_capacity(commissions.len());

        for node in hierarchy.display_order() {
            if let Some(result) = commissions.get(&node.id) {
                rows.push(self.row(node.level_label(), aggregation.get(&node.id), result));
            }
        }

        for partner in hierarchy.partners() {
            if let Some(result) = commissions.get(&partner.name) {
                rows.push(self.row("Partner".to_string(), aggregation.get(&partner.name), result));
            }
        }

        for totals in aggregation.of_kind(NodeKind::Other) {
            if let Some(result) = commissions.get(&totals.node_id) {
                rows.push(self.row("Other".to_string(), Some(totals), result));
            }
        }

        rows
    }

    pub fn summarize(
        &self,
        aggregation: &AggregationResult,
        commissions: &CommissionSet,
    ) -> Result<ReportSummary> {
        Ok(ReportSummary {
            total_amount: aggregation.grand_total(),
            total_commission: commissions.total_commission()?.round_dp(self.precision),
            node_count: commissions.len(),
            transaction_count: aggregation.transaction_count(),
        })
    }

    /// Rule lines for the rules sheet
    pub fn describe_rules(
        &self,
        hierarchy: &AgentHierarchy,
        options: &CalculationOptions,
    ) -> Vec<String> {
        let mut lines = Vec::new();

        let mode = match options.mode {
            CascadeMode::Cumulative => "each level is paid on its whole subtree",
            CascadeMode::Net => "each level is paid on its own volume, descendant shares netted",
        };
        lines.push(format!(
            "Mode {}: {} (gating: {})",
            options.mode, mode, options.gating
        ));

        for node in hierarchy.display_order() {
            let base = if node.is_leaf {
                "own amount"
            } else {
                "cascaded amount"
            };
            lines.push(format!(
                "{}: level {} × {} of {}",
                node.id,
                node.depth,
                format_rate(node.rate),
                base
            ));
        }

        if options.leaf_distribution == LeafDistribution::EqualShare {
            lines.push("Sibling leaves split their pooled commission equally".to_string());
        }

        for partner in hierarchy.partners() {
            lines.push(format!(
                "{}: total amount × {}",
                partner.name,
                format_rate(partner.rate)
            ));
        }

        lines.push(format!(
            "Other agents: total amount × {}",
            format_rate(hierarchy.other_rate())
        ));

        lines
    }

    fn row(
        &self,
        level_label: String,
        totals: Option<&LocationTotals>,
        result: &CommissionResult,
    ) -> ReportRow {
        ReportRow {
            node_id: result.node_id.clone(),
            kind: result.kind,
            level_label,
            transaction_count: totals.map(|t| t.transaction_count).unwrap_or(0),
            total_amount: rounded(totals, self.precision, |t| t.total_amount),
            positive_amount: rounded(totals, self.precision, |t| t.positive_amount),
            negative_amount: rounded(totals, self.precision, |t| t.negative_amount),
            effective_amount: result.effective_amount.round_dp(self.precision),
            average_amount: totals
                .and_then(|t| t.average_amount())
                .map(|a| a.round_dp(self.precision)),
            min_amount: totals.and_then(|t| t.min_amount),
            max_amount: totals.and_then(|t| t.max_amount),
            bonus_total: rounded(totals, self.precision, |t| t.bonus_total),
            base_amount: result.base_amount.round_dp(self.precision),
            rate: result.rate,
            rate_label: format_rate(result.rate),
            commission_amount: result.commission_amount.round_dp(self.precision),
            explanation: result.explanation.clone(),
        }
    }
}

fn rounded(
    totals: Option<&LocationTotals>,
    precision: u32,
    pick: impl Fn(&LocationTotals) -> Decimal,
) -> Decimal {
    totals.map(pick).unwrap_or(Decimal::ZERO).round_dp(precision)
}

impl Default for ResultAssembler {
    fn default() -> Self {
        Self::new(2)
    }
}
