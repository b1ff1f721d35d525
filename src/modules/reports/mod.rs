pub mod models;
pub mod services;

pub use models::{CommissionReport, ReportRow, ReportSummary};
pub use services::{ReportService, ResultAssembler};
