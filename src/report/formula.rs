// The small formula subset the report writes: type probes and cell division.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::sheet::{CellAddress, CellValue, SheetError};

static TYPE_PROBE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^=\s*TYPE\(\s*([A-Z]+[0-9]+)\s*\)\s*$").unwrap());
static DIVISION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^=\s*([A-Z]+[0-9]+)\s*/\s*([A-Z]+[0-9]+)\s*$").unwrap()
});

// Nested formula references deeper than this are treated as circular
const MAX_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formula {
    TypeOf(CellAddress),
    Divide(CellAddress, CellAddress),
}

impl FromStr for Formula {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_uppercase();
        if let Some(caps) = TYPE_PROBE.captures(&text) {
            return Ok(Formula::TypeOf(caps[1].parse()?));
        }
        if let Some(caps) = DIVISION.captures(&text) {
            return Ok(Formula::Divide(caps[1].parse()?, caps[2].parse()?));
        }
        Err(SheetError::UnsupportedFormula(s.to_string()))
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::TypeOf(target) => write!(f, "=TYPE({target})"),
            Formula::Divide(numerator, denominator) => write!(f, "={numerator}/{denominator}"),
        }
    }
}

/// What a grid cell stores before evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum StoredCell {
    Value(CellValue),
    Formula(Formula),
}

/// Days since the spreadsheet epoch (1899-12-30)
pub fn date_serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() as f64
}

/// Evaluate `formula`, resolving references through `lookup`
pub fn evaluate<'a, F>(formula: &Formula, lookup: &F) -> CellValue
where
    F: Fn(CellAddress) -> Option<&'a StoredCell>,
{
    evaluate_at_depth(formula, lookup, 0)
}

fn evaluate_at_depth<'a, F>(formula: &Formula, lookup: &F, depth: usize) -> CellValue
where
    F: Fn(CellAddress) -> Option<&'a StoredCell>,
{
    if depth > MAX_DEPTH {
        return CellValue::Error("#REF!".to_string());
    }

    match formula {
        Formula::TypeOf(target) => {
            let value = resolve(*target, lookup, depth);
            CellValue::Number(value.type_code() as f64)
        }
        Formula::Divide(numerator, denominator) => {
            let numerator = match as_number(resolve(*numerator, lookup, depth)) {
                Ok(n) => n,
                Err(e) => return e,
            };
            let denominator = match as_number(resolve(*denominator, lookup, depth)) {
                Ok(n) => n,
                Err(e) => return e,
            };
            if denominator == 0.0 {
                CellValue::Error("#DIV/0!".to_string())
            } else {
                CellValue::Number(numerator / denominator)
            }
        }
    }
}

fn resolve<'a, F>(at: CellAddress, lookup: &F, depth: usize) -> CellValue
where
    F: Fn(CellAddress) -> Option<&'a StoredCell>,
{
    match lookup(at) {
        None => CellValue::Empty,
        Some(StoredCell::Value(value)) => value.clone(),
        Some(StoredCell::Formula(inner)) => evaluate_at_depth(inner, lookup, depth + 1),
    }
}

fn as_number(value: CellValue) -> Result<f64, CellValue> {
    match value {
        CellValue::Empty => Ok(0.0),
        CellValue::Number(n) => Ok(n),
        CellValue::Date(d) => Ok(date_serial(d)),
        CellValue::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
        CellValue::Text(_) => Err(CellValue::Error("#VALUE!".to_string())),
        CellValue::Error(e) => Err(CellValue::Error(e)),
    }
}
