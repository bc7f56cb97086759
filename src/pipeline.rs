// Raw scraped rows -> windowed, delta-annotated series -> combined report rows

pub mod delta;
pub mod merger;
pub mod month_window;
pub mod row_parser;

use std::str::FromStr;

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use crate::models::{RawPair, Record, Series};

pub use delta::{annotate_changes, retain_complete};
pub use merger::merge_series;
pub use month_window::select_month_window;
pub use row_parser::{parse_row, RowParseError};

/// What to do with a row whose date or rate text cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRowPolicy {
    #[default]
    Skip,
    Abort,
}

impl FromStr for MalformedRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown malformed row policy: {other}")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Malformed row {row}: {source}")]
    MalformedRow {
        row: usize,
        #[source]
        source: RowParseError,
    },
}

/// Turn one currency's scraped rows into the records that go into the report.
///
/// Placeholder rows are dropped, the rest parsed, windowed to `reference`'s month,
/// annotated with day-over-day changes, and only records carrying a change are kept.
#[instrument(skip(raw_pairs), fields(rows = raw_pairs.len()))]
pub fn build_series(
    raw_pairs: &[RawPair],
    reference: NaiveDate,
    policy: MalformedRowPolicy,
) -> Result<Series, PipelineError> {
    let mut parsed = Vec::with_capacity(raw_pairs.len());
    let mut skipped_rows = 0;

    for (index, raw) in raw_pairs.iter().enumerate() {
        if raw.is_placeholder() {
            debug!("Row {}: placeholder, dropping {:?}", index + 1, raw);
            continue;
        }

        match parse_row(raw) {
            Ok(record) => parsed.push(record),
            Err(e) => match policy {
                MalformedRowPolicy::Skip => {
                    warn!("Unsupported data format in row {}: {}", index + 1, e);
                    skipped_rows += 1;
                }
                MalformedRowPolicy::Abort => {
                    return Err(PipelineError::MalformedRow {
                        row: index + 1,
                        source: e,
                    });
                }
            },
        }
    }

    if skipped_rows > 0 {
        warn!("Skipped {} unparseable rows out of {}", skipped_rows, raw_pairs.len());
    }

    let mut window: Vec<Record> = select_month_window(parsed, reference);
    debug!("Month window holds {} records", window.len());

    annotate_changes(&mut window);
    let series = retain_complete(window);
    debug!("Series holds {} complete records", series.len());

    Ok(series)
}
