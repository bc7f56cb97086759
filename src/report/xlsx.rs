use std::collections::BTreeMap;
use std::path::Path;

use rust_xlsxwriter::{Format, Formula as XlsxFormula, Workbook};
use tracing::{debug, info, instrument};

use super::formula::{date_serial, evaluate, Formula, StoredCell};
use super::sheet::{CellAddress, CellRange, CellValue, RenderSink, SheetError};

const DEFAULT_DATE_FORMAT: &str = "dd.mm.yyyy";

/// Single-sheet `.xlsx` report.
///
/// Cells are kept in memory until `save_as`, which is what lets formulas be
/// evaluated on read-back. Number formats are applied per range, the last
/// matching range wins.
pub struct XlsxReport {
    sheet_name: String,
    cells: BTreeMap<CellAddress, StoredCell>,
    formats: Vec<(CellRange, String)>,
    autofit: Option<(u16, u16)>,
    closed: bool,
}

impl XlsxReport {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            cells: BTreeMap::new(),
            formats: Vec::new(),
            autofit: None,
            closed: false,
        }
    }

    pub fn number_format_at(&self, at: CellAddress) -> Option<&str> {
        self.formats
            .iter()
            .rev()
            .find(|(range, _)| range.contains(at))
            .map(|(_, format)| format.as_str())
    }

    pub fn autofit_range(&self) -> Option<(u16, u16)> {
        self.autofit
    }

    fn ensure_open(&self) -> Result<(), SheetError> {
        if self.closed {
            Err(SheetError::Closed)
        } else {
            Ok(())
        }
    }

    fn evaluate(&self, formula: &Formula) -> CellValue {
        evaluate(formula, &|at| self.cells.get(&at))
    }

    fn write_cell(
        &self,
        worksheet: &mut rust_xlsxwriter::Worksheet,
        at: CellAddress,
        cell: &StoredCell,
    ) -> Result<(), SheetError> {
        let row = at.row - 1;
        let col = at.col - 1;
        let format = self.number_format_at(at).map(|f| Format::new().set_num_format(f));

        match cell {
            StoredCell::Value(CellValue::Empty) => {}
            StoredCell::Value(CellValue::Number(n)) => match &format {
                Some(format) => {
                    worksheet.write_number_with_format(row, col, *n, format)?;
                }
                None => {
                    worksheet.write_number(row, col, *n)?;
                }
            },
            StoredCell::Value(CellValue::Date(date)) => {
                let format = format
                    .unwrap_or_else(|| Format::new().set_num_format(DEFAULT_DATE_FORMAT));
                worksheet.write_number_with_format(row, col, date_serial(*date), &format)?;
            }
            StoredCell::Value(CellValue::Text(text)) | StoredCell::Value(CellValue::Error(text)) => {
                worksheet.write_string(row, col, text)?;
            }
            StoredCell::Value(CellValue::Bool(b)) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            StoredCell::Formula(formula) => {
                let cached = match self.evaluate(formula) {
                    CellValue::Number(n) => n.to_string(),
                    CellValue::Error(e) => e,
                    other => format!("{other:?}"),
                };
                let formula = XlsxFormula::new(formula.to_string()).set_result(cached);
                match &format {
                    Some(format) => {
                        worksheet.write_formula_with_format(row, col, formula, format)?;
                    }
                    None => {
                        worksheet.write_formula(row, col, formula)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl RenderSink for XlsxReport {
    fn write_row(&mut self, at: CellAddress, values: &[CellValue]) -> Result<(), SheetError> {
        self.ensure_open()?;
        for (offset, value) in values.iter().enumerate() {
            let target = at.offset_cols(offset as u16);
            self.cells.insert(target, StoredCell::Value(value.clone()));
        }
        Ok(())
    }

    fn write_formula(&mut self, at: CellAddress, formula: &str) -> Result<(), SheetError> {
        self.ensure_open()?;
        let formula: Formula = formula.parse()?;
        self.cells.insert(at, StoredCell::Formula(formula));
        Ok(())
    }

    fn set_number_format(&mut self, range: CellRange, format: &str) -> Result<(), SheetError> {
        self.ensure_open()?;
        debug!("Number format {} -> {}", range, format);
        self.formats.push((range, format.to_string()));
        Ok(())
    }

    fn autofit_columns(&mut self, first_col: u16, last_col: u16) -> Result<(), SheetError> {
        self.ensure_open()?;
        self.autofit = Some((first_col, last_col));
        Ok(())
    }

    fn read_back(&self, at: CellAddress) -> Result<CellValue, SheetError> {
        self.ensure_open()?;
        Ok(match self.cells.get(&at) {
            None => CellValue::Empty,
            Some(StoredCell::Value(value)) => value.clone(),
            Some(StoredCell::Formula(formula)) => self.evaluate(formula),
        })
    }

    fn clear(&mut self, at: CellAddress) -> Result<(), SheetError> {
        self.ensure_open()?;
        self.cells.remove(&at);
        Ok(())
    }

    #[instrument(skip(self), fields(sheet = %self.sheet_name, cells = self.cells.len()))]
    fn save_as(&mut self, path: &Path) -> Result<(), SheetError> {
        self.ensure_open()?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (at, cell) in &self.cells {
            self.write_cell(worksheet, *at, cell)?;
        }

        if self.autofit.is_some() {
            worksheet.autofit();
        }

        workbook.save(path)?;
        info!("Saved report to {}", path.display());
        Ok(())
    }

    fn close(&mut self) {
        self.cells.clear();
        self.formats.clear();
        self.closed = true;
    }
}
