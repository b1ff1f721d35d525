pub mod calculation_options;
pub mod commission_result;
pub mod location_totals;

pub use calculation_options::{CalculationOptions, CascadeMode, GatingPolicy, LeafDistribution};
pub use commission_result::{CommissionResult, CommissionSet};
pub use location_totals::{AggregationResult, LocationTotals};
