pub mod models;
pub mod services;

pub use models::{
    AggregationResult, CalculationOptions, CascadeMode, CommissionResult, CommissionSet,
    GatingPolicy, LeafDistribution, LocationTotals,
};
pub use services::{Aggregator, CommissionCalculator};
