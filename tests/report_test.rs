// Saved workbooks read back with calamine

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use moex_rate_report::models::{CombinedRow, Record};
use moex_rate_report::report::{ValidationResult, SHEET_NAME};
use moex_rate_report::services::write_report;

fn record(day: u32, rate: f64, change: f64) -> Record {
    Record {
        date: NaiveDate::from_ymd_opt(2020, 11, day).unwrap(),
        rate,
        change: Some(change),
    }
}

fn rows() -> Vec<CombinedRow> {
    vec![
        CombinedRow {
            usd: record(25, 76.0, 0.5),
            eur: record(25, 90.0, 0.75),
        },
        CombinedRow {
            usd: record(24, 75.5, 0.5),
            eur: record(24, 89.25, 0.25),
        },
    ]
}

#[test]
fn test_write_report_saves_typed_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report_2020-11-26_10.00.xlsx");

    let report = write_report(&rows(), &path).unwrap();

    assert_eq!(report.row_count, 2);
    assert_eq!(report.status, ValidationResult::AllNumeric);
    assert_eq!(report.description, "В отчете 2 строки. Все данные числового типа.");
    assert!(path.exists());

    let mut workbook: Xlsx<_> = open_workbook(&path).expect("Failed to open saved report");
    let range = workbook
        .worksheet_range(SHEET_NAME)
        .expect("Report sheet missing");

    assert_eq!(range.get((0, 0)), Some(&Data::String("USD_date".to_string())));
    assert_eq!(range.get((0, 6)), Some(&Data::String("EUR_to_USD".to_string())));
    assert_eq!(range.get((1, 1)), Some(&Data::Float(76.0)));
    assert_eq!(range.get((2, 5)), Some(&Data::Float(0.25)));
    assert!(matches!(
        range.get((1, 0)),
        Some(Data::DateTime(_)) | Some(Data::Float(_))
    ));

    // The validation scratch column must not survive into the saved file
    assert_eq!(range.width(), 7);
    assert_eq!(range.height(), 3);
}

#[test]
fn test_write_report_without_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");

    let report = write_report(&[], &path).unwrap();

    assert_eq!(report.row_count, 0);
    assert_eq!(report.description, "В отчете 0 строк. Все данные числового типа.");
    assert!(path.exists());
}

#[test]
fn test_write_report_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("report.xlsx");

    assert!(write_report(&rows(), &path).is_err());
}
