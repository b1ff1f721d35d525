//! Agent Commission Library
//!
//! Sorts a batch of agent transactions, resolves each location against a
//! configured multi-level agent hierarchy and computes the commission owed
//! to every node.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use config::{CommissionRules, Config};
pub use core::{AppError, Result};
pub use modules::commissions;
pub use modules::hierarchy;
pub use modules::reports;
pub use modules::transactions;
