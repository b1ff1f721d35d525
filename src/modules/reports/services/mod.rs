pub mod report_service;
pub mod result_assembler;

pub use report_service::ReportService;
pub use result_assembler::ResultAssembler;
