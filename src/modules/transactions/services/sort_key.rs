use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::modules::transactions::models::TransactionRecord;

/// Rank given to locations missing from the priority table; sorts after every known one
pub const UNRANKED_LOCATION: u32 = u32::MAX;

/// Total-order key for a transaction
///
/// Field order is the comparison order: location rank, agent type rank,
/// agent number, then location and agent text as tie-breakers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SortKey {
    pub location_rank: u32,
    pub agent_type_rank: u8,
    pub agent_number: u64,
    pub location: String,
    pub agent: String,
}

/// Produces sort keys from a fixed location priority table
pub struct SortKeyGenerator {
    priority: HashMap<String, u32>,
}

impl SortKeyGenerator {
    /// Build from location codes in priority order (first = rank 1)
    pub fn new<I, S>(location_priority: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut priority = HashMap::new();
        for (i, code) in location_priority.into_iter().enumerate() {
            // First occurrence wins if a code is listed twice
            priority.entry(code.into()).or_insert(i as u32 + 1);
        }
        Self { priority }
    }

    pub fn location_rank(&self, location: &str) -> u32 {
        self.priority
            .get(location)
            .copied()
            .unwrap_or(UNRANKED_LOCATION)
    }

    pub fn key(&self, record: &TransactionRecord) -> SortKey {
        let agent = record.agent_str();
        SortKey {
            location_rank: self.location_rank(&record.location),
            agent_type_rank: record.agent_type().rank(),
            agent_number: extract_agent_number(agent),
            location: record.location.clone(),
            agent: agent.to_string(),
        }
    }

    /// Stable sort; records with equal keys keep their input order
    pub fn sort(&self, mut records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
        records.sort_by_cached_key(|r| self.key(r));
        debug!("Sorted {} transaction records", records.len());
        records
    }
}

/// First maximal run of ASCII digits in the agent code, 0 when there is none
///
/// Runs too long for `u64` saturate instead of failing.
pub fn extract_agent_number(agent_code: &str) -> u64 {
    agent_code
        .trim()
        .split(|c: char| !c.is_ascii_digit())
        .find(|run| !run.is_empty())
        .map(|run| run.parse().unwrap_or(u64::MAX))
        .unwrap_or(0)
}
