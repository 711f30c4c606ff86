pub mod report;
pub mod summary;

pub use report::ReportService;
