pub mod commission_report;

pub use commission_report::{CommissionReport, ReportRow, ReportSummary};
