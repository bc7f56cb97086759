use chrono::{Datelike, NaiveDate};

use crate::models::Record;

/// Keep the records of `reference`'s month plus the first older record.
///
/// Input is expected newest first. The older record is the anchor that lets the
/// oldest current-month day get a change value. If no older record exists the
/// input comes back unchanged.
pub fn select_month_window(records: Vec<Record>, reference: NaiveDate) -> Vec<Record> {
    let current = (reference.year(), reference.month());
    let mut window = Vec::with_capacity(records.len());

    for record in records {
        let is_older = (record.date.year(), record.date.month()) < current;
        window.push(record);
        if is_older {
            break;
        }
    }

    window
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records(dates: &[NaiveDate]) -> Vec<Record> {
        dates.iter().map(|d| Record::new(*d, 75.0)).collect()
    }

    #[test]
    fn test_window_keeps_one_prior_month_row() {
        let input = records(&[
            day(2020, 11, 6),
            day(2020, 11, 5),
            day(2020, 11, 3),
            day(2020, 11, 2),
            day(2020, 10, 30),
            day(2020, 10, 29),
        ]);

        let window = select_month_window(input, day(2020, 11, 7));

        assert_eq!(window.len(), 5);
        assert_eq!(window[3].date, day(2020, 11, 2));
        assert_eq!(window[4].date, day(2020, 10, 30));
    }

    #[test]
    fn test_window_without_older_rows_returns_everything() {
        let input = records(&[day(2020, 11, 6), day(2020, 11, 5), day(2020, 11, 3)]);

        let window = select_month_window(input.clone(), day(2020, 11, 7));

        assert_eq!(window, input);
    }

    #[test]
    fn test_window_first_row_already_prior_month() {
        let input = records(&[day(2020, 10, 30), day(2020, 10, 29), day(2020, 10, 28)]);

        let window = select_month_window(input, day(2020, 11, 1));

        assert_eq!(window.len(), 1);
        assert_eq!(window[0].date, day(2020, 10, 30));
    }

    #[test]
    fn test_window_across_year_boundary() {
        let input = records(&[day(2021, 1, 12), day(2021, 1, 11), day(2020, 12, 30), day(2020, 12, 29)]);

        let window = select_month_window(input, day(2021, 1, 13));

        assert_eq!(window.len(), 3);
        assert_eq!(window[2].date, day(2020, 12, 30));
    }

    #[test]
    fn test_window_empty_input() {
        assert!(select_month_window(Vec::new(), day(2020, 11, 7)).is_empty());
    }
}
