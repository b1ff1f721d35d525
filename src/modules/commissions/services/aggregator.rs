use tracing::{debug, info, warn};

use crate::modules::commissions::models::{AggregationResult, GatingPolicy, LocationTotals};
use crate::modules::hierarchy::services::HierarchyResolver;
use crate::modules::transactions::models::{AmountIssue, TransactionRecord};

/// Sums signed amounts per resolved node
pub struct Aggregator {
    gating: GatingPolicy,
}

impl Aggregator {
    pub fn new(gating: GatingPolicy) -> Self {
        Self { gating }
    }

    /// Build totals for every node that at least one record resolves to
    ///
    /// Totals are rebuilt from scratch on every call; nothing carries over
    /// between batches. An amount that would push the batch sums out of the
    /// decimal range is left out and reported as an amount issue; its row
    /// still counts as a transaction.
    pub fn aggregate(
        &self,
        records: &[TransactionRecord],
        resolver: &HierarchyResolver,
    ) -> AggregationResult {
        let mut result = AggregationResult::new(self.gating);

        for record in records {
            let node = resolver.resolve(&record.location);
            let batch_sums = record.amount.map(|a| (a, result.checked_extend(a)));

            let totals = result
                .totals
                .entry(node.id.clone())
                .or_insert_with(|| LocationTotals::new(&node));
            totals.count_row(record);

            let Some((amount, sums)) = batch_sums else {
                continue;
            };
            match sums {
                Some((positive, negative)) if totals.add_amount(amount) => {
                    result.positive_total = positive;
                    result.negative_total = negative;
                }
                _ => {
                    warn!(
                        "Row {}: amount {} overflows the batch totals, treated as null",
                        record.row_index, amount
                    );
                    result.amount_issues.push(AmountIssue {
                        row_index: record.row_index,
                        raw: amount.to_string(),
                    });
                }
            }
        }

        for totals in result.totals.values_mut() {
            totals.effective_amount = totals.gated_amount(self.gating);
            debug!(
                node = totals.node_id.as_str(),
                kind = totals.kind.as_str(),
                total = %totals.total_amount,
                effective = %totals.effective_amount,
                "Aggregated node"
            );
        }

        info!(
            "Aggregated {} records into {} nodes (gating: {})",
            records.len(),
            result.len(),
            self.gating
        );

        result
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(GatingPolicy::default())
    }
}
