pub mod models;
pub mod services;

pub use models::{AgentHierarchy, HierarchyNode, NodeKind, ResolvedNode};
pub use services::HierarchyResolver;
