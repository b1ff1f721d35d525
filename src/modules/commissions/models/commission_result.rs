use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::amount::checked_sum;
use crate::core::Result;
use crate::modules::commissions::models::CalculationOptions;
use crate::modules::hierarchy::models::NodeKind;

/// Commission owed to one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionResult {
    pub node_id: String,
    pub kind: NodeKind,
    /// Amount the rate was applied to (cascaded base for hierarchy nodes)
    pub base_amount: Decimal,
    pub rate: Decimal,
    /// `base_amount × rate` before any netting or pooling
    pub gross_commission: Decimal,
    /// Portion of the gross attributed to child subtrees and netted out
    pub descendant_offset: Decimal,
    pub commission_amount: Decimal,
    /// Signed total of the node's own transactions
    pub raw_total_amount: Decimal,
    /// Node's own gated contribution
    pub effective_amount: Decimal,
    /// Commission came from an equal split of a sibling-leaf pool
    pub pooled: bool,
    pub explanation: String,
}

/// Every commission computed for one batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionSet {
    pub options: CalculationOptions,
    pub results: BTreeMap<String, CommissionResult>,
}

impl CommissionSet {
    pub fn new(options: CalculationOptions) -> Self {
        Self {
            options,
            results: BTreeMap::new(),
        }
    }

    pub fn get(&self, node_id: &str) -> Option<&CommissionResult> {
        self.results.get(node_id)
    }

    /// Commission of a node, zero when it has no result
    pub fn commission(&self, node_id: &str) -> Decimal {
        self.get(node_id)
            .map(|r| r.commission_amount)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn insert(&mut self, result: CommissionResult) {
        self.results.insert(result.node_id.clone(), result);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommissionResult> {
        self.results.values()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Sum of every commission
    ///
    /// # Errors
    /// `Validation` when the sum leaves the decimal range.
    pub fn total_commission(&self) -> Result<Decimal> {
        checked_sum(
            self.results.values().map(|r| r.commission_amount),
            "Total commission",
        )
    }
}
