use tracing::warn;

use crate::models::{CombinedRow, Record};

/// Pair USD and EUR records by position, truncating to the shorter series.
///
/// Both series are assumed to follow the same trading calendar. Rows are never
/// matched by date; a position whose dates disagree is only logged.
pub fn merge_series(usd: Vec<Record>, eur: Vec<Record>) -> Vec<CombinedRow> {
    let rows: Vec<CombinedRow> = usd
        .into_iter()
        .zip(eur)
        .map(|(usd, eur)| CombinedRow { usd, eur })
        .collect();

    for (index, row) in rows.iter().enumerate() {
        if !row.dates_aligned() {
            warn!(
                "Row {} pairs USD {} with EUR {}, calendars differ",
                index + 1,
                row.usd.date,
                row.eur.date
            );
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, rate: f64) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2020, 11, day).unwrap(),
            rate,
            change: Some(0.0),
        }
    }

    #[test]
    fn test_merge_truncates_to_shorter_series() {
        let usd = vec![record(6, 76.0), record(5, 77.0), record(4, 78.0)];
        let eur = vec![record(6, 90.0), record(5, 91.0)];

        let rows = merge_series(usd.clone(), eur.clone());

        assert_eq!(rows.len(), 2);
        for i in 0..2 {
            assert_eq!(rows[i].usd, usd[i]);
            assert_eq!(rows[i].eur, eur[i]);
        }
    }

    #[test]
    fn test_merge_is_positional() {
        let usd = vec![record(6, 76.0)];
        let eur = vec![record(5, 91.0)];

        let rows = merge_series(usd, eur);

        assert_eq!(rows.len(), 1);
        assert!(!rows[0].dates_aligned());
    }

    #[test]
    fn test_merge_with_empty_side() {
        assert!(merge_series(vec![record(6, 76.0)], Vec::new()).is_empty());
    }
}
