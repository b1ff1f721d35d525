pub mod raw_table;
pub mod transaction_record;

pub use raw_table::{AmountIssue, RawTable};
pub use transaction_record::{AgentType, TransactionRecord};
