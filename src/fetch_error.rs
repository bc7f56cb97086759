#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected HTTP status {status} for {currency}")]
    Status {
        status: reqwest::StatusCode,
        currency: String,
    },
    #[error("No rate table rows found in HTML for {0}")]
    EmptyTable(String),
}
