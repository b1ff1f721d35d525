pub mod agent_hierarchy;
pub mod hierarchy_node;

pub use agent_hierarchy::AgentHierarchy;
pub use hierarchy_node::{HierarchyNode, NodeKind, ResolvedNode};
