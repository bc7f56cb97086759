use std::fmt;
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};

use crate::fetch_error::FetchError;
use crate::models::RawPair;

pub const DEFAULT_BASE_URL: &str = "https://www.moex.com/ru/derivatives/currency-rate.aspx";

// Column positions inside a MOEX rate table row
const DATE_COLUMN: usize = 0;
const CLEARING_RATE_COLUMN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPair {
    UsdRub,
    EurRub,
}

impl CurrencyPair {
    pub fn as_param(&self) -> &'static str {
        match self {
            CurrencyPair::UsdRub => "USD_RUB",
            CurrencyPair::EurRub => "EUR_RUB",
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

#[derive(Clone)]
pub struct RateTableFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl RateTableFetcher {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Download the rate page for `pair` and extract its (date, rate) cells
    #[instrument(skip(self), fields(url = %self.base_url))]
    pub async fn fetch_pairs(&self, pair: CurrencyPair) -> Result<Vec<RawPair>, FetchError> {
        debug!("Sending HTTP request for {}", pair);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("currency", pair.as_param())])
            .send()
            .await?;
        debug!("Received HTTP response with status: {}", response.status());

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                currency: pair.to_string(),
            });
        }

        let html = response.text().await?;
        debug!("Retrieved HTML content, size: {} bytes", html.len());

        let pairs = parse_rate_table(&html);
        if pairs.is_empty() {
            warn!("No rate rows found for {}", pair);
        }
        Ok(pairs)
    }
}

/// Extract the date and clearing-rate cells of every classed `<tr>`.
///
/// Rows with fewer than three cells are skipped.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn parse_rate_table(html: &str) -> Vec<RawPair> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("tr[class]").unwrap();

    let mut pairs = Vec::new();
    let mut short_rows = 0;

    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td")
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();

        match (cells.get(DATE_COLUMN), cells.get(CLEARING_RATE_COLUMN)) {
            (Some(date), Some(rate)) => {
                debug!("Row {}: date='{}', rate='{}'", pairs.len() + 1, date, rate);
                pairs.push(RawPair::new(date.as_str(), rate.as_str()));
            }
            _ => short_rows += 1,
        }
    }

    if short_rows > 0 {
        debug!("Ignored {} classed rows without rate cells", short_rows);
    }
    debug!("Extracted {} raw rows", pairs.len());

    pairs
}
