pub mod models;
pub mod services;

pub use models::{AgentType, AmountIssue, RawTable, TransactionRecord};
pub use services::{RecordNormalizer, SortKeyGenerator};
