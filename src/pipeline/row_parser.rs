use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{RawPair, Record};

pub const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowParseError {
    #[error("Invalid date format: {0:?}")]
    Date(String),

    #[error("Invalid rate value: {0:?}")]
    Rate(String),
}

/// Parse one scraped row into a record without a change value.
///
/// Dates use `DD.MM.YYYY`, rates use a decimal comma (`"85,5"`).
pub fn parse_row(raw: &RawPair) -> Result<Record, RowParseError> {
    let date_text = raw.date_text.trim();
    let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT)
        .map_err(|_| RowParseError::Date(date_text.to_string()))?;

    let rate = parse_rate(&raw.rate_text)?;

    Ok(Record::new(date, rate))
}

fn parse_rate(text: &str) -> Result<f64, RowParseError> {
    let normalized: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match normalized.parse::<f64>() {
        Ok(rate) if rate.is_finite() => Ok(rate),
        _ => Err(RowParseError::Rate(text.trim().to_string())),
    }
}
