use chrono::NaiveDate;

// Raw scraped text, before any parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPair {
    pub date_text: String,
    pub rate_text: String,
}

impl RawPair {
    pub fn new(date_text: impl Into<String>, rate_text: impl Into<String>) -> Self {
        Self {
            date_text: date_text.into(),
            rate_text: rate_text.into(),
        }
    }

    /// MOEX renders days without trading as `-` in either column
    pub fn is_placeholder(&self) -> bool {
        self.date_text.contains('-') || self.rate_text.contains('-')
    }
}

/// One day's clearing rate for one currency
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub rate: f64,
    /// Difference to the next-older record; `None` until annotated
    pub change: Option<f64>,
}

impl Record {
    pub fn new(date: NaiveDate, rate: f64) -> Self {
        Self {
            date,
            rate,
            change: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.change.is_some()
    }
}

/// Records of one currency, newest first
pub type Series = Vec<Record>;

/// Two records sharing an ordinal position in their series
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub usd: Record,
    pub eur: Record,
}

impl CombinedRow {
    pub fn dates_aligned(&self) -> bool {
        self.usd.date == self.eur.date
    }

    /// EUR/USD implied by the two ruble rates
    pub fn cross_rate(&self) -> f64 {
        self.eur.rate / self.usd.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_detection() {
        assert!(RawPair::new("-", "75,10").is_placeholder());
        assert!(RawPair::new("24.11.2020", "-").is_placeholder());
        assert!(!RawPair::new("24.11.2020", "75,10").is_placeholder());
    }

    #[test]
    fn test_cross_rate() {
        let date = NaiveDate::from_ymd_opt(2020, 11, 25).unwrap();
        let row = CombinedRow {
            usd: Record::new(date, 80.0),
            eur: Record::new(date, 96.0),
        };
        assert!(row.dates_aligned());
        assert!((row.cross_rate() - 1.2).abs() < 1e-12);
    }
}
