use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::core::amount::{checked_sum, format_rate};
use crate::core::Result;
use crate::modules::commissions::models::{
    AggregationResult, CalculationOptions, CascadeMode, CommissionResult, CommissionSet,
    GatingPolicy, LeafDistribution, LocationTotals,
};
use crate::modules::hierarchy::models::{AgentHierarchy, HierarchyNode, NodeKind, ResolvedNode};

/// Walks the agent tree bottom-up and prices every node
///
/// Pure function of the aggregated totals, the hierarchy and the options;
/// nodes with no transactions count as zero so ancestors still price correctly.
pub struct CommissionCalculator {
    options: CalculationOptions,
}

impl CommissionCalculator {
    pub fn new(options: CalculationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CalculationOptions {
        &self.options
    }

    /// Compute one result per hierarchy node plus one per partner/other bucket present
    ///
    /// # Errors
    /// `Validation` when a commission base or the total commission leaves the
    /// decimal range.
    pub fn calculate(
        &self,
        hierarchy: &AgentHierarchy,
        aggregation: &AggregationResult,
    ) -> Result<CommissionSet> {
        let mut set = CommissionSet::new(self.options);
        let bases = self.cascaded_bases(hierarchy, aggregation)?;

        for node in hierarchy.nodes() {
            let result = self.price_hierarchy_node(node, hierarchy, aggregation, &bases)?;
            debug!(
                node = node.id.as_str(),
                base = %result.base_amount,
                commission = %result.commission_amount,
                "Priced hierarchy node"
            );
            set.insert(result);
        }

        if self.options.leaf_distribution == LeafDistribution::EqualShare {
            self.pool_sibling_leaves(hierarchy, &mut set)?;
        }

        for totals in aggregation.iter().filter(|t| t.kind != NodeKind::Hierarchy) {
            set.insert(self.price_flat_node(totals, hierarchy));
        }

        let total = set.total_commission()?;
        info!(
            "Calculated {} commissions (mode: {}, gating: {}, leaves: {}), total {}",
            set.len(),
            self.options.mode,
            self.options.gating,
            self.options.leaf_distribution,
            total
        );

        Ok(set)
    }

    /// Own effective amount plus that of every descendant, per hierarchy node
    pub fn cascaded_bases(
        &self,
        hierarchy: &AgentHierarchy,
        aggregation: &AggregationResult,
    ) -> Result<HashMap<String, Decimal>> {
        let mut bases: HashMap<String, Decimal> = HashMap::with_capacity(hierarchy.len());

        for node in hierarchy.bottom_up() {
            let own = self.effective_amount(aggregation, &node.id);
            let children = hierarchy.children(&node.id);
            let below = children
                .iter()
                .map(|child| bases.get(child.id.as_str()).copied().unwrap_or(Decimal::ZERO));
            let base = checked_sum(
                std::iter::once(own).chain(below),
                &format!("Commission base of {}", node.id),
            )?;
            bases.insert(node.id.clone(), base);
        }

        Ok(bases)
    }

    fn effective_amount(&self, aggregation: &AggregationResult, node_id: &str) -> Decimal {
        aggregation
            .get(node_id)
            .map(|t| t.gated_amount(self.options.gating))
            .unwrap_or(Decimal::ZERO)
    }

    fn price_hierarchy_node(
        &self,
        node: &HierarchyNode,
        hierarchy: &AgentHierarchy,
        aggregation: &AggregationResult,
        bases: &HashMap<String, Decimal>,
    ) -> Result<CommissionResult> {
        let base_of = |id: &str| bases.get(id).copied().unwrap_or(Decimal::ZERO);
        let children = hierarchy.children(&node.id);
        let totals = aggregation.get(&node.id);

        let own = self.effective_amount(aggregation, &node.id);
        let base = base_of(node.id.as_str());
        let gross = base * node.rate;

        // Net: whatever this node's rate earns on a child subtree is netted back out
        let descendant_offset = match self.options.mode {
            CascadeMode::Cumulative => Decimal::ZERO,
            CascadeMode::Net => checked_sum(
                children.iter().map(|child| base_of(child.id.as_str()) * node.rate),
                &format!("Descendant share of {}", node.id),
            )?,
        };
        let commission = (gross - descendant_offset).max(Decimal::ZERO);

        let mut parts = vec![self.describe_own_amount(totals)];
        if children.is_empty() {
            parts.push(format!("base {}", self.amount(base)));
        } else {
            parts.push(format!(
                "cascaded base {} (own {} + descendants {})",
                self.amount(base),
                self.amount(own),
                self.amount(base - own)
            ));
        }
        parts.push(format!("× {} = {}", format_rate(node.rate), self.amount(gross)));
        if self.options.mode == CascadeMode::Net && !children.is_empty() {
            parts.push(format!(
                "less descendant share {} = {}",
                self.amount(descendant_offset),
                self.amount(commission)
            ));
        }

        Ok(CommissionResult {
            node_id: node.id.clone(),
            kind: NodeKind::Hierarchy,
            base_amount: base,
            rate: node.rate,
            gross_commission: gross,
            descendant_offset,
            commission_amount: commission,
            raw_total_amount: totals.map(|t| t.total_amount).unwrap_or(Decimal::ZERO),
            effective_amount: own,
            pooled: false,
            explanation: parts.join("; "),
        })
    }

    /// Replace each sibling-leaf group's commissions by an equal split of their pool
    ///
    /// Only leaves with a strictly positive effective amount receive a share.
    fn pool_sibling_leaves(
        &self,
        hierarchy: &AgentHierarchy,
        set: &mut CommissionSet,
    ) -> Result<()> {
        for group in hierarchy.leaf_sibling_groups() {
            if group.len() < 2 {
                continue;
            }

            let pool = checked_sum(
                group.iter().map(|n| set.commission(&n.id)),
                "Sibling leaf pool",
            )?;
            let eligible: Vec<&str> = group
                .iter()
                .filter(|n| {
                    set.get(&n.id)
                        .map(|r| r.effective_amount > Decimal::ZERO)
                        .unwrap_or(false)
                })
                .map(|n| n.id.as_str())
                .collect();
            let shares = split_evenly(pool, eligible.len(), self.options.precision);

            debug!(
                "Pooling {} across {} of {} sibling leaves",
                pool,
                eligible.len(),
                group.len()
            );

            for node in &group {
                let share = eligible
                    .iter()
                    .position(|id| *id == node.id)
                    .map(|i| shares[i])
                    .unwrap_or(Decimal::ZERO);

                if let Some(result) = set.results.get_mut(&node.id) {
                    result.commission_amount = share;
                    result.pooled = true;
                    result.explanation.push_str(&format!(
                        "; pooled {} split among {} positive sibling leaves = {}",
                        self.amount(pool),
                        eligible.len(),
                        self.amount(share)
                    ));
                }
            }
        }

        Ok(())
    }

    /// Partners and other buckets: flat rate on their own total, never negative
    fn price_flat_node(&self, totals: &LocationTotals, hierarchy: &AgentHierarchy) -> CommissionResult {
        let node = ResolvedNode {
            id: totals.node_id.clone(),
            kind: totals.kind,
        };
        let rate = hierarchy.rate_for(&node);
        let base = totals.total_amount.max(Decimal::ZERO);
        let commission = base * rate;

        let explanation = if totals.total_amount > Decimal::ZERO {
            format!(
                "total {} × {} = {}",
                self.amount(totals.total_amount),
                format_rate(rate),
                self.amount(commission)
            )
        } else {
            format!(
                "total {} is not positive, no commission at {}",
                self.amount(totals.total_amount),
                format_rate(rate)
            )
        };

        CommissionResult {
            node_id: totals.node_id.clone(),
            kind: totals.kind,
            base_amount: base,
            rate,
            gross_commission: commission,
            descendant_offset: Decimal::ZERO,
            commission_amount: commission,
            raw_total_amount: totals.total_amount,
            effective_amount: base,
            pooled: false,
            explanation,
        }
    }

    fn describe_own_amount(&self, totals: Option<&LocationTotals>) -> String {
        let Some(t) = totals else {
            return "no transactions".to_string();
        };

        match self.options.gating {
            GatingPolicy::TotalSign if t.total_amount > Decimal::ZERO => {
                format!("own total {} counted", self.amount(t.total_amount))
            }
            GatingPolicy::TotalSign => {
                format!("own total {} gated to 0", self.amount(t.total_amount))
            }
            GatingPolicy::PositiveOnly if t.negative_amount < Decimal::ZERO => format!(
                "own positive {} counted, negative {} ignored",
                self.amount(t.positive_amount),
                self.amount(t.negative_amount)
            ),
            GatingPolicy::PositiveOnly => {
                format!("own positive {} counted", self.amount(t.positive_amount))
            }
        }
    }

    fn amount(&self, value: Decimal) -> String {
        format!("{:.*}", self.options.precision as usize, value)
    }
}

impl Default for CommissionCalculator {
    fn default() -> Self {
        Self::new(CalculationOptions::default())
    }
}

const MAX_SCALE: u32 = 28;

/// Split `pool` into `count` non-negative shares at `precision` that sum to the pool
///
/// Every share starts at the truncated quotient; the remainder is handed out one
/// unit of `precision` at a time from the first share, and any sub-unit leftover
/// goes to the last share.
fn split_evenly(pool: Decimal, count: usize, precision: u32) -> Vec<Decimal> {
    if count == 0 {
        return Vec::new();
    }

    let pool = pool.max(Decimal::ZERO);
    let n = Decimal::from(count);
    let precision = precision.min(MAX_SCALE);
    let unit = Decimal::new(1, precision);
    let base = (pool / n).round_dp_with_strategy(precision, RoundingStrategy::ToZero);

    let mut remainder = pool - base * n;
    let mut shares = vec![base; count];
    for share in shares.iter_mut() {
        if remainder < unit {
            break;
        }
        *share += unit;
        remainder -= unit;
    }
    shares[count - 1] += remainder;
    shares
}
