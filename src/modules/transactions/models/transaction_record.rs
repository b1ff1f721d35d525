use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One normalized transaction row
///
/// Immutable once produced by the normalizer; the pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Location / hierarchy label the row was booked under
    pub location: String,
    /// Agent sequence code, e.g. `IN12B` or `OUT-07`
    pub agent_code: Option<String>,
    /// Signed amount; `None` when the cell could not be read as a number
    pub amount: Option<Decimal>,
    pub bonus: Option<Decimal>,
    /// 1-based position among the retained data rows
    pub row_index: usize,
}

impl TransactionRecord {
    pub fn new(
        location: impl Into<String>,
        agent_code: Option<String>,
        amount: Option<Decimal>,
        row_index: usize,
    ) -> Self {
        Self {
            location: location.into(),
            agent_code,
            amount,
            bonus: None,
            row_index,
        }
    }

    pub fn with_bonus(mut self, bonus: Option<Decimal>) -> Self {
        self.bonus = bonus;
        self
    }

    /// Agent code as text, empty when absent
    pub fn agent_str(&self) -> &str {
        self.agent_code.as_deref().unwrap_or("")
    }

    pub fn agent_type(&self) -> AgentType {
        AgentType::classify(self.agent_str())
    }
}

/// Direction class of an agent code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    In,
    Out,
    Other,
}

impl AgentType {
    /// Classify by case-insensitive substring; `IN` is checked before `OUT`
    pub fn classify(agent_code: &str) -> Self {
        let upper = agent_code.to_uppercase();
        if upper.contains("IN") {
            Self::In
        } else if upper.contains("OUT") {
            Self::Out
        } else {
            Self::Other
        }
    }

    /// Sort rank: IN first, OUT second, everything else last
    pub fn rank(&self) -> u8 {
        match self {
            Self::In => 1,
            Self::Out => 2,
            Self::Other => 3,
        }
    }
}
