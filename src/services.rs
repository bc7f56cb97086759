pub mod report_service;

pub use report_service::{write_report, GeneratedReport, ReportError, ReportService};
