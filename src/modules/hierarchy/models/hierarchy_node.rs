use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One position in the agent tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: String,
    pub parent_id: Option<String>,
    /// Commission rate as a decimal fraction
    pub rate: Decimal,
    /// 1 = top of its family
    pub depth: u32,
    pub is_leaf: bool,
    pub label: Option<String>,
}

impl HierarchyNode {
    /// Label shown in reports, e.g. `"Level 2 (Senior agent)"`
    pub fn level_label(&self) -> String {
        match &self.label {
            Some(label) => format!("Level {} ({})", self.depth, label),
            None => format!("Level {}", self.depth),
        }
    }
}

/// Where a location string resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A node of the configured tree
    Hierarchy,
    /// A named account on the fixed allow-list
    Partner,
    /// Catch-all bucket keyed by the raw location
    Other,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hierarchy => "hierarchy",
            Self::Partner => "partner",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed result of resolving a raw location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedNode {
    pub id: String,
    pub kind: NodeKind,
}

impl ResolvedNode {
    pub fn hierarchy(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Hierarchy,
        }
    }

    pub fn partner(name: impl Into<String>) -> Self {
        Self {
            id: name.into(),
            kind: NodeKind::Partner,
        }
    }

    pub fn other(raw: impl Into<String>) -> Self {
        Self {
            id: raw.into(),
            kind: NodeKind::Other,
        }
    }
}
