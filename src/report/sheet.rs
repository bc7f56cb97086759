use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    #[error("Unsupported formula: {0}")]
    UnsupportedFormula(String),

    #[error("Sheet is already closed")]
    Closed,

    #[error("Workbook write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// A typed value held by a sheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Date(NaiveDate),
    Text(String),
    Bool(bool),
    /// Evaluation error such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// Spreadsheet `TYPE()` code: 1 number, 2 text, 4 boolean, 16 error.
    /// Dates are stored as serial numbers and blanks count as numbers.
    pub fn type_code(&self) -> u8 {
        match self {
            CellValue::Empty | CellValue::Number(_) | CellValue::Date(_) => 1,
            CellValue::Text(_) => 2,
            CellValue::Bool(_) => 4,
            CellValue::Error(_) => 16,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// 1-based (row, column) address, rendered in A1 notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddress {
    pub row: u32,
    pub col: u16,
}

impl CellAddress {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    pub fn offset_cols(&self, by: u16) -> Self {
        Self::new(self.row, self.col + by)
    }
}

/// Column letters for a 1-based column index (1 -> A, 27 -> AA)
pub fn column_letters(col: u16) -> String {
    let mut n = col as u32;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SheetError::InvalidAddress(s.to_string());
        let split = s.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let (letters, digits) = s.split_at(split);

        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(invalid());
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            col = col * 26 + (c as u32 - 'A' as u32 + 1);
            if col > u16::MAX as u32 {
                return Err(invalid());
            }
        }

        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(CellAddress::new(row, col as u16))
    }
}

/// Inclusive rectangular range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first: CellAddress,
    pub last: CellAddress,
}

impl CellRange {
    pub fn new(first: CellAddress, last: CellAddress) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, at: CellAddress) -> bool {
        (self.first.row..=self.last.row).contains(&at.row)
            && (self.first.col..=self.last.col).contains(&at.col)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.last)
    }
}

/// The rendering surface a report is written to.
///
/// `read_back` returns what the sheet itself holds after evaluation, which may
/// differ from what was written.
pub trait RenderSink {
    fn write_row(&mut self, at: CellAddress, values: &[CellValue]) -> Result<(), SheetError>;

    fn write_formula(&mut self, at: CellAddress, formula: &str) -> Result<(), SheetError>;

    fn set_number_format(&mut self, range: CellRange, format: &str) -> Result<(), SheetError>;

    fn autofit_columns(&mut self, first_col: u16, last_col: u16) -> Result<(), SheetError>;

    fn read_back(&self, at: CellAddress) -> Result<CellValue, SheetError>;

    fn clear(&mut self, at: CellAddress) -> Result<(), SheetError>;

    fn save_as(&mut self, path: &Path) -> Result<(), SheetError>;

    fn close(&mut self);
}
