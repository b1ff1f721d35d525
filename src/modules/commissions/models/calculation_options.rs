use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an ancestor's commission relates to the volume booked below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeMode {
    /// Each node is paid its rate on its whole subtree's volume, stacking across levels
    #[default]
    Cumulative,
    /// Each node keeps only what is left after netting out its children's subtrees
    ///
    /// `commission = max(rate × base − Σ rate × base(child), 0)` over the node's
    /// immediate children, which is `rate × own effective amount`.
    Net,
}

/// Which aggregate a node contributes to commission bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatingPolicy {
    /// `total_amount` when it is positive, otherwise zero
    #[default]
    TotalSign,
    /// `positive_amount`, ignoring negative entries
    PositiveOnly,
}

/// How commission is distributed among sibling leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafDistribution {
    /// Every leaf is paid on its own base
    #[default]
    Independent,
    /// Sibling leaves pool their commissions and split evenly among the positive ones
    EqualShare,
}

/// Knobs selecting one of the supported commission semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationOptions {
    pub mode: CascadeMode,
    pub gating: GatingPolicy,
    pub leaf_distribution: LeafDistribution,
    /// Decimal places used for report amounts and pooled shares
    pub precision: u32,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            mode: CascadeMode::default(),
            gating: GatingPolicy::default(),
            leaf_distribution: LeafDistribution::default(),
            precision: 2,
        }
    }
}

impl CalculationOptions {
    pub fn new(mode: CascadeMode, gating: GatingPolicy) -> Self {
        Self {
            mode,
            gating,
            ..Self::default()
        }
    }

    pub fn with_leaf_distribution(mut self, leaf_distribution: LeafDistribution) -> Self {
        self.leaf_distribution = leaf_distribution;
        self
    }
}

impl CascadeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cumulative => "cumulative",
            Self::Net => "net",
        }
    }
}

impl GatingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalSign => "total_sign",
            Self::PositiveOnly => "positive_only",
        }
    }
}

impl LeafDistribution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Independent => "independent",
            Self::EqualShare => "equal_share",
        }
    }
}

impl fmt::Display for CascadeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for GatingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for LeafDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CascadeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cumulative" | "a" => Ok(Self::Cumulative),
            "net" | "b" => Ok(Self::Net),
            _ => Err(format!("Invalid commission mode: {}", s)),
        }
    }
}

impl FromStr for GatingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "total_sign" => Ok(Self::TotalSign),
            "positive_only" => Ok(Self::PositiveOnly),
            _ => Err(format!("Invalid gating policy: {}", s)),
        }
    }
}

impl FromStr for LeafDistribution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "independent" => Ok(Self::Independent),
            "equal_share" => Ok(Self::EqualShare),
            _ => Err(format!("Invalid leaf distribution: {}", s)),
        }
    }
}
