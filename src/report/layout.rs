use tracing::{debug, instrument};

use super::sheet::{column_letters, CellAddress, CellRange, CellValue, RenderSink, SheetError};
use crate::models::{CombinedRow, Record};

pub const SHEET_NAME: &str = "USD and EUR to RUB rate";

pub const HEADERS: [&str; 7] = [
    "USD_date",
    "USD_rate",
    "USD_change",
    "EUR_date",
    "EUR_rate",
    "EUR_change",
    "EUR_to_USD",
];

/// Ruble amount, shaped like the built-in currency format
pub const RUBLE_FORMAT: &str = r#"_-* #,##0.00 "₽"_-;-* #,##0.00 "₽"_-;_-* "-"?? "₽"_-;_-@_-"#;
pub const DATE_FORMAT: &str = "dd.mm.yyyy";

const USD_RATE_COL: u16 = 2;
const EUR_RATE_COL: u16 = 5;
const CROSS_RATE_COL: u16 = 7;

/// Dimensions of a rendered report, header row included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportShape {
    pub columns: u16,
    pub rows: u32,
}

impl ReportShape {
    pub fn data_rows(&self) -> u32 {
        self.rows.saturating_sub(1)
    }
}

fn record_cells(record: &Record) -> [CellValue; 3] {
    [
        CellValue::Date(record.date),
        CellValue::Number(record.rate),
        record.change.map_or(CellValue::Empty, CellValue::Number),
    ]
}

pub fn cross_rate_formula(row: u32) -> String {
    format!(
        "={}{row}/{}{row}",
        column_letters(EUR_RATE_COL),
        column_letters(USD_RATE_COL)
    )
}

/// Write headers, one line per combined row with the EUR/USD formula in column G,
/// then number formats and column widths.
#[instrument(skip(sink, rows), fields(rows = rows.len()))]
pub fn render_report<S: RenderSink>(
    sink: &mut S,
    rows: &[CombinedRow],
) -> Result<ReportShape, SheetError> {
    let headers: Vec<CellValue> = HEADERS.iter().map(|h| CellValue::from(*h)).collect();
    sink.write_row(CellAddress::new(1, 1), &headers)?;

    let mut last_row = 1;
    for row in rows {
        last_row += 1;
        let mut cells = Vec::with_capacity(6);
        cells.extend(record_cells(&row.usd));
        cells.extend(record_cells(&row.eur));
        sink.write_row(CellAddress::new(last_row, 1), &cells)?;
        sink.write_formula(
            CellAddress::new(last_row, CROSS_RATE_COL),
            &cross_rate_formula(last_row),
        )?;
    }

    if last_row > 1 {
        let column_range = |first: u16, last: u16| {
            CellRange::new(CellAddress::new(2, first), CellAddress::new(last_row, last))
        };
        sink.set_number_format(column_range(2, 3), RUBLE_FORMAT)?;
        sink.set_number_format(column_range(5, 6), RUBLE_FORMAT)?;
        sink.set_number_format(column_range(1, 1), DATE_FORMAT)?;
        sink.set_number_format(column_range(4, 4), DATE_FORMAT)?;
    }
    sink.autofit_columns(1, HEADERS.len() as u16)?;

    let shape = ReportShape {
        columns: HEADERS.len() as u16,
        rows: last_row,
    };
    debug!("Rendered report shape {:?}", shape);
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::xlsx::XlsxReport;
    use chrono::NaiveDate;

    fn addr(s: &str) -> CellAddress {
        s.parse().unwrap()
    }

    fn record(day: u32, rate: f64, change: f64) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2020, 11, day).unwrap(),
            rate,
            change: Some(change),
        }
    }

    #[test]
    fn test_cross_rate_formula() {
        assert_eq!(cross_rate_formula(2), "=E2/B2");
        assert_eq!(cross_rate_formula(15), "=E15/B15");
    }

    #[test]
    fn test_render_report_layout() {
        let rows = vec![
            CombinedRow {
                usd: record(25, 80.0, 0.5),
                eur: record(25, 96.0, -0.25),
            },
            CombinedRow {
                usd: record(24, 79.5, 1.0),
                eur: record(24, 96.25, 0.75),
            },
        ];
        let mut sheet = XlsxReport::new(SHEET_NAME);

        let shape = render_report(&mut sheet, &rows).unwrap();

        assert_eq!(shape, ReportShape { columns: 7, rows: 3 });
        assert_eq!(shape.data_rows(), 2);
        assert_eq!(sheet.read_back(addr("A1")).unwrap(), CellValue::from("USD_date"));
        assert_eq!(sheet.read_back(addr("G1")).unwrap(), CellValue::from("EUR_to_USD"));
        assert_eq!(
            sheet.read_back(addr("D2")).unwrap(),
            CellValue::Date(NaiveDate::from_ymd_opt(2020, 11, 25).unwrap())
        );
        assert_eq!(sheet.read_back(addr("C3")).unwrap(), CellValue::Number(1.0));
        assert_eq!(sheet.read_back(addr("F2")).unwrap(), CellValue::Number(-0.25));
        assert_eq!(sheet.read_back(addr("G2")).unwrap(), CellValue::Number(1.2));
        assert_eq!(sheet.number_format_at(addr("B3")), Some(RUBLE_FORMAT));
        assert_eq!(sheet.number_format_at(addr("F2")), Some(RUBLE_FORMAT));
        assert_eq!(sheet.number_format_at(addr("A2")), Some(DATE_FORMAT));
        assert_eq!(sheet.number_format_at(addr("G2")), None);
        assert_eq!(sheet.autofit_range(), Some((1, 7)));
    }

    #[test]
    fn test_render_empty_report_has_only_headers() {
        let mut sheet = XlsxReport::new(SHEET_NAME);

        let shape = render_report(&mut sheet, &[]).unwrap();

        assert_eq!(shape.rows, 1);
        assert_eq!(shape.data_rows(), 0);
        assert_eq!(sheet.read_back(addr("A2")).unwrap(), CellValue::Empty);
        assert_eq!(sheet.number_format_at(addr("B2")), None);
    }
}
