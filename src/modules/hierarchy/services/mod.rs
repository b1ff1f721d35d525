pub mod hierarchy_resolver;

pub use hierarchy_resolver::HierarchyResolver;
