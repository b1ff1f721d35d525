use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

use crate::config::{CommissionRules, PartnerRule};
use crate::core::Result;
use crate::modules::hierarchy::models::{HierarchyNode, NodeKind, ResolvedNode};

/// Read-only agent tree plus the flat-rate accounts outside it
///
/// Built once from validated rules and shared by every calculation.
#[derive(Debug, Clone)]
pub struct AgentHierarchy {
    /// Nodes in declaration order (parents always before children)
    nodes: Vec<HierarchyNode>,
    index: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
    partners: Vec<PartnerRule>,
    other_rate: Decimal,
    unknown_location_label: String,
}

impl AgentHierarchy {
    /// Build the tree from rule tables, deriving depth and leaf flags
    pub fn from_rules(rules: &CommissionRules) -> Result<Self> {
        rules.validate()?;

        let mut nodes: Vec<HierarchyNode> = Vec::with_capacity(rules.nodes.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(rules.nodes.len());
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); rules.nodes.len()];

        for (i, rule) in rules.nodes.iter().enumerate() {
            // validate() guarantees the parent was declared earlier
            let depth = match rule.parent.as_ref().and_then(|p| index.get(p)) {
                Some(&parent_idx) => {
                    children[parent_idx].push(i);
                    nodes[parent_idx].depth + 1
                }
                None => 1,
            };

            nodes.push(HierarchyNode {
                id: rule.id.clone(),
                parent_id: rule.parent.clone(),
                rate: rule.rate,
                depth,
                is_leaf: true,
                label: rule.label.clone(),
            });
            index.insert(rule.id.clone(), i);
        }

        for (i, kids) in children.iter().enumerate() {
            nodes[i].is_leaf = kids.is_empty();
        }

        debug!(
            "Built agent hierarchy: {} nodes, {} partners",
            nodes.len(),
            rules.partners.len()
        );

        Ok(Self {
            nodes,
            index,
            children,
            partners: rules.partners.clone(),
            other_rate: rules.other_rate,
            unknown_location_label: rules.unknown_location_label.clone(),
        })
    }

    pub fn get(&self, id: &str) -> Option<&HierarchyNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All nodes in declaration order
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Immediate children of a node, in declaration order
    pub fn children(&self, id: &str) -> Vec<&HierarchyNode> {
        self.index
            .get(id)
            .map(|&i| self.children[i].iter().map(|&c| &self.nodes[c]).collect())
            .unwrap_or_default()
    }

    pub fn roots(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.iter().filter(|n| n.parent_id.is_none())
    }

    /// Node ids ordered children-before-parents
    ///
    /// Declaration order has parents first, so its reverse is a valid bottom-up order.
    pub fn bottom_up(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.iter().rev()
    }

    /// Report order: by depth (top level first), declaration order within a level
    pub fn display_order(&self) -> Vec<&HierarchyNode> {
        let mut ordered: Vec<(usize, &HierarchyNode)> = self.nodes.iter().enumerate().collect();
        ordered.sort_by_key(|(i, n)| (n.depth, *i));
        ordered.into_iter().map(|(_, n)| n).collect()
    }

    /// Groups of sibling leaves, keyed by their parent (roots that are leaves form no group)
    pub fn leaf_sibling_groups(&self) -> Vec<Vec<&HierarchyNode>> {
        self.children
            .iter()
            .map(|kids| {
                kids.iter()
                    .map(|&c| &self.nodes[c])
                    .filter(|n| n.is_leaf)
                    .collect::<Vec<_>>()
            })
            .filter(|group| !group.is_empty())
            .collect()
    }

    pub fn partners(&self) -> &[PartnerRule] {
        &self.partners
    }

    pub fn other_rate(&self) -> Decimal {
        self.other_rate
    }

    pub fn unknown_location_label(&self) -> &str {
        &self.unknown_location_label
    }

    /// Rate for a resolved node of any kind; unknown ids fall back to the other rate
    pub fn rate_for(&self, node: &ResolvedNode) -> Decimal {
        match node.kind {
            NodeKind::Hierarchy => self.get(&node.id).map(|n| n.rate),
            NodeKind::Partner => self
                .partners
                .iter()
                .find(|p| p.name == node.id)
                .map(|p| p.rate),
            NodeKind::Other => None,
        }
        .unwrap_or(self.other_rate)
    }
}
