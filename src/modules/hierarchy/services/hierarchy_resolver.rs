use tracing::trace;

use crate::modules::hierarchy::models::{AgentHierarchy, ResolvedNode};

/// Maps raw location strings to typed nodes
///
/// Resolution is total: every input lands on a hierarchy node, a partner,
/// or an "other" bucket keyed by the raw string.
pub struct HierarchyResolver {
    /// Hierarchy codes, longest first
    codes: Vec<String>,
    /// Partner names with their upper-cased match form
    partners: Vec<(String, String)>,
    unknown_location_label: String,
}

impl HierarchyResolver {
    pub fn new(hierarchy: &AgentHierarchy) -> Self {
        let mut codes: Vec<(usize, &str)> = hierarchy
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, n)| (i, n.id.as_str()))
            .collect();
        // Deepest codes extend their ancestors, so testing longest first keeps
        // a generic prefix from absorbing a descendant's rows.
        codes.sort_by(|(ia, a), (ib, b)| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then(ia.cmp(ib))
        });

        Self {
            codes: codes.into_iter().map(|(_, c)| c.to_string()).collect(),
            partners: hierarchy
                .partners()
                .iter()
                .map(|p| (p.name.clone(), p.name.to_uppercase()))
                .collect(),
            unknown_location_label: hierarchy.unknown_location_label().to_string(),
        }
    }

    pub fn resolve(&self, raw: &str) -> ResolvedNode {
        let location = raw.trim();
        if location.is_empty() {
            return ResolvedNode::other(self.unknown_location_label.clone());
        }

        if let Some(code) = self.codes.iter().find(|code| location.contains(code.as_str())) {
            trace!(location, code = code.as_str(), "Resolved to hierarchy node");
            return ResolvedNode::hierarchy(code.clone());
        }

        let upper = location.to_uppercase();
        if let Some((name, _)) = self
            .partners
            .iter()
            .find(|(_, pattern)| upper.contains(pattern.as_str()))
        {
            trace!(location, partner = name.as_str(), "Resolved to partner");
            return ResolvedNode::partner(name.clone());
        }

        ResolvedNode::other(location)
    }

    /// Hierarchy codes in the order they are tested
    pub fn candidate_codes(&self) -> &[String] {
        &self.codes
    }
}
