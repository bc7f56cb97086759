use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::fetch_error::FetchError;
use crate::fetcher::{CurrencyPair, RateTableFetcher};
use crate::models::CombinedRow;
use crate::pipeline::{build_series, merge_series, MalformedRowPolicy, PipelineError};
use crate::report::{
    describe_report, render_report, validate_numeric_cells, RenderSink, SheetError,
    ValidationResult, XlsxReport, SHEET_NAME,
};

/// Error types for a report run
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Pipeline failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),
}

/// A saved report and the summary that goes with it
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub path: PathBuf,
    pub row_count: usize,
    pub status: ValidationResult,
    pub description: String,
}

/// Fetches both currencies and turns them into a validated workbook
#[derive(Clone)]
pub struct ReportService {
    fetcher: RateTableFetcher,
    policy: MalformedRowPolicy,
}

impl ReportService {
    pub fn new(fetcher: RateTableFetcher, policy: MalformedRowPolicy) -> Self {
        Self { fetcher, policy }
    }

    /// USD then EUR, one after the other, merged by position
    #[instrument(skip(self))]
    pub async fn collect_rows(&self, reference: NaiveDate) -> Result<Vec<CombinedRow>, ReportError> {
        let usd_pairs = self.fetcher.fetch_pairs(CurrencyPair::UsdRub).await?;
        let usd = build_series(&usd_pairs, reference, self.policy)?;
        info!("USD series: {} records", usd.len());

        let eur_pairs = self.fetcher.fetch_pairs(CurrencyPair::EurRub).await?;
        let eur = build_series(&eur_pairs, reference, self.policy)?;
        info!("EUR series: {} records", eur.len());

        if usd.len() != eur.len() {
            warn!(
                "Series lengths differ (USD {}, EUR {}), report keeps {}",
                usd.len(),
                eur.len(),
                usd.len().min(eur.len())
            );
        }

        Ok(merge_series(usd, eur))
    }
}

/// Render `rows`, validate the rendered cells, then save to `path`
#[instrument(skip(rows), fields(rows = rows.len()))]
pub fn write_report(rows: &[CombinedRow], path: &Path) -> Result<GeneratedReport, ReportError> {
    let mut sheet = XlsxReport::new(SHEET_NAME);
    let result = render_validate_save(&mut sheet, rows, path);
    sheet.close();
    let status = result?;

    let description = describe_report(rows.len(), status);
    info!("{}", description);

    Ok(GeneratedReport {
        path: path.to_path_buf(),
        row_count: rows.len(),
        status,
        description,
    })
}

fn render_validate_save<S: RenderSink>(
    sink: &mut S,
    rows: &[CombinedRow],
    path: &Path,
) -> Result<ValidationResult, ReportError> {
    let shape = render_report(sink, rows)?;
    let status = validate_numeric_cells(sink, shape)?;
    sink.save_as(path)?;
    Ok(status)
}
