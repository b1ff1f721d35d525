pub mod commissions;
pub mod hierarchy;
pub mod reports;
pub mod transactions;
