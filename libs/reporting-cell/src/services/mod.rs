pub mod queries;
pub mod reporting;

pub use reporting::ReportingService;
