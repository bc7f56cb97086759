// Spreadsheet rendering, post-render type validation and the report summary

pub mod describer;
pub mod formula;
pub mod layout;
pub mod sheet;
pub mod validator;
pub mod xlsx;

use chrono::NaiveDateTime;

pub use describer::{describe_report, row_noun};
pub use layout::{render_report, ReportShape, SHEET_NAME};
pub use sheet::{CellAddress, CellRange, CellValue, RenderSink, SheetError};
pub use validator::{validate_numeric_cells, ValidationResult};
pub use xlsx::XlsxReport;

/// File name of the report produced at `now`, e.g. `report_2020-11-25_18.05.xlsx`
pub fn report_file_name(now: NaiveDateTime) -> String {
    format!("report_{}.xlsx", now.format("%Y-%m-%d_%H.%M"))
}
