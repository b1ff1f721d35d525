pub mod aggregator;
pub mod commission_calculator;

pub use aggregator::Aggregator;
pub use commission_calculator::CommissionCalculator;
