use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::core::{AppError, Result};

/// Rule file shipped with the crate, used when no external file is configured
pub const DEFAULT_RULES_YAML: &str = include_str!("../../config/commission_rules.yaml");

/// Externally loaded commission rule tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionRules {
    /// Hierarchy nodes, parents listed before children
    pub nodes: Vec<NodeRule>,
    /// Named accounts outside the hierarchy
    #[serde(default)]
    pub partners: Vec<PartnerRule>,
    /// Sort priority of location codes
    #[serde(default)]
    pub location_priority: Vec<String>,
    /// Flat rate for locations matching neither a node nor a partner
    pub other_rate: Decimal,
    /// Bucket id for rows whose location cell is empty
    #[serde(default = "default_unknown_location_label")]
    pub unknown_location_label: String,
    #[serde(default)]
    pub columns: ColumnNames,
}

/// One hierarchy node as written in the rule file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRule {
    pub id: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub rate: Decimal,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerRule {
    pub name: String,
    pub rate: Decimal,
}

/// Header names of the columns the normalizer reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub location: String,
    pub agent_code: String,
    pub amount: String,
    pub bonus: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            location: "上分地方".to_string(),
            agent_code: "代理序号".to_string(),
            amount: "金额".to_string(),
            bonus: "BONUS".to_string(),
        }
    }
}

fn default_unknown_location_label() -> String {
    "未知地点".to_string()
}

impl CommissionRules {
    /// Parse and validate rules from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let rules: CommissionRules = serde_yaml::from_str(yaml)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load and validate rules from a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let rules = Self::from_yaml_str(&yaml)?;

        info!(
            "Loaded commission rules from {} ({} nodes, {} partners)",
            path.display(),
            rules.nodes.len(),
            rules.partners.len()
        );

        Ok(rules)
    }

    /// Validate the structural invariants of the rule tables
    ///
    /// Ids are unique across nodes and partners, every parent is declared
    /// before its children (which rules out cycles), and all rates lie in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();

        for node in &self.nodes {
            if node.id.trim().is_empty() {
                return Err(AppError::configuration("Node id cannot be empty"));
            }
            validate_rate(&node.id, node.rate)?;

            if let Some(parent) = &node.parent {
                if !seen.contains(parent.as_str()) {
                    return Err(AppError::configuration(format!(
                        "Node {} references parent {} which is not declared before it",
                        node.id, parent
                    )));
                }
            }

            if !seen.insert(node.id.as_str()) {
                return Err(AppError::configuration(format!(
                    "Duplicate node id: {}",
                    node.id
                )));
            }
        }

        for partner in &self.partners {
            if partner.name.trim().is_empty() {
                return Err(AppError::configuration("Partner name cannot be empty"));
            }
            validate_rate(&partner.name, partner.rate)?;

            if !seen.insert(partner.name.as_str()) {
                return Err(AppError::configuration(format!(
                    "Partner {} duplicates another node or partner",
                    partner.name
                )));
            }
        }

        validate_rate("other", self.other_rate)?;

        if self.unknown_location_label.trim().is_empty() {
            return Err(AppError::configuration(
                "unknown_location_label cannot be empty",
            ));
        }

        Ok(())
    }
}

impl Default for CommissionRules {
    fn default() -> Self {
        serde_yaml::from_str(DEFAULT_RULES_YAML).unwrap_or_else(|_| Self {
            nodes: Vec::new(),
            partners: Vec::new(),
            location_priority: Vec::new(),
            other_rate: Decimal::new(30, 2),
            unknown_location_label: default_unknown_location_label(),
            columns: ColumnNames::default(),
        })
    }
}

fn validate_rate(owner: &str, rate: Decimal) -> Result<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(AppError::configuration(format!(
            "Rate for {} must be between 0 and 1, got {}",
            owner, rate
        )));
    }
    Ok(())
}
