use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::modules::commissions::models::GatingPolicy;
use crate::modules::hierarchy::models::{NodeKind, ResolvedNode};
use crate::modules::transactions::models::{AgentType, AmountIssue, TransactionRecord};

/// Aggregated amounts of every transaction routed to one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationTotals {
    pub node_id: String,
    pub kind: NodeKind,
    /// Signed sum of all non-null amounts
    pub total_amount: Decimal,
    /// Sum of amounts > 0
    pub positive_amount: Decimal,
    /// Sum of amounts < 0
    pub negative_amount: Decimal,
    /// Gated contribution under the policy used when aggregating
    pub effective_amount: Decimal,
    /// Rows routed here, null amounts included
    pub transaction_count: usize,
    /// Rows with a non-null amount
    pub amount_count: usize,
    pub in_count: usize,
    pub out_count: usize,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub bonus_total: Decimal,
}

impl LocationTotals {
    pub fn new(node: &ResolvedNode) -> Self {
        Self {
            node_id: node.id.clone(),
            kind: node.kind,
            total_amount: Decimal::ZERO,
            positive_amount: Decimal::ZERO,
            negative_amount: Decimal::ZERO,
            effective_amount: Decimal::ZERO,
            transaction_count: 0,
            amount_count: 0,
            in_count: 0,
            out_count: 0,
            min_amount: None,
            max_amount: None,
            bonus_total: Decimal::ZERO,
        }
    }

    /// Count a row and its bonus without touching the amount sums
    pub fn count_row(&mut self, record: &TransactionRecord) {
        self.transaction_count += 1;

        match record.agent_type() {
            AgentType::In => self.in_count += 1,
            AgentType::Out => self.out_count += 1,
            AgentType::Other => {}
        }

        if let Some(bonus) = record.bonus {
            match self.bonus_total.checked_add(bonus) {
                Some(sum) => self.bonus_total = sum,
                None => warn!(
                    "Row {}: bonus {} overflows the bonus total of {}, ignored",
                    record.row_index, bonus, self.node_id
                ),
            }
        }
    }

    /// Add one amount to the sums, all or nothing
    ///
    /// Returns `false` and leaves every sum unchanged when one would overflow.
    pub fn add_amount(&mut self, amount: Decimal) -> bool {
        let Some(total) = self.total_amount.checked_add(amount) else {
            return false;
        };
        let (positive, negative) = if amount > Decimal::ZERO {
            match self.positive_amount.checked_add(amount) {
                Some(p) => (p, self.negative_amount),
                None => return false,
            }
        } else {
            match self.negative_amount.checked_add(amount) {
                Some(n) => (self.positive_amount, n),
                None => return false,
            }
        };

        self.amount_count += 1;
        self.total_amount = total;
        self.positive_amount = positive;
        self.negative_amount = negative;
        self.min_amount = Some(self.min_amount.map_or(amount, |m| m.min(amount)));
        self.max_amount = Some(self.max_amount.map_or(amount, |m| m.max(amount)));
        true
    }

    /// Contribution to commission bases under the given policy
    pub fn gated_amount(&self, policy: GatingPolicy) -> Decimal {
        match policy {
            GatingPolicy::TotalSign => self.total_amount.max(Decimal::ZERO),
            GatingPolicy::PositiveOnly => self.positive_amount,
        }
    }

    /// Mean over non-null amounts
    pub fn average_amount(&self) -> Option<Decimal> {
        if self.amount_count == 0 {
            None
        } else {
            Some(self.total_amount / Decimal::from(self.amount_count))
        }
    }
}

/// Totals for every node present in one batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    pub gating: GatingPolicy,
    pub totals: BTreeMap<String, LocationTotals>,
    /// Sum of every accepted amount > 0; bounds any subset sum of node amounts
    pub positive_total: Decimal,
    /// Sum of every accepted amount < 0
    pub negative_total: Decimal,
    /// Amounts left out because they would overflow the batch sums
    pub amount_issues: Vec<AmountIssue>,
}

impl AggregationResult {
    pub fn new(gating: GatingPolicy) -> Self {
        Self {
            gating,
            totals: BTreeMap::new(),
            positive_total: Decimal::ZERO,
            negative_total: Decimal::ZERO,
            amount_issues: Vec::new(),
        }
    }

    pub fn get(&self, node_id: &str) -> Option<&LocationTotals> {
        self.totals.get(node_id)
    }

    /// Effective amount of a node, zero when no rows reached it
    pub fn effective_amount(&self, node_id: &str) -> Decimal {
        self.get(node_id)
            .map(|t| t.effective_amount)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationTotals> {
        self.totals.values()
    }

    pub fn of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &LocationTotals> {
        self.totals.values().filter(move |t| t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum of total_amount over every node
    pub fn grand_total(&self) -> Decimal {
        // opposite signs, cannot overflow
        self.positive_total + self.negative_total
    }

    /// Batch sums after accepting `amount`, `None` if either would overflow
    pub fn checked_extend(&self, amount: Decimal) -> Option<(Decimal, Decimal)> {
        if amount > Decimal::ZERO {
            Some((self.positive_total.checked_add(amount)?, self.negative_total))
        } else {
            Some((self.positive_total, self.negative_total.checked_add(amount)?))
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.totals.values().map(|t| t.transaction_count).sum()
    }
}
