use crate::core::{aggregator, csv_renderer};
use crate::domain::model::{Report, ReportPeriod};
use crate::domain::ports::{OrderStore, ReportPresenter};
use crate::utils::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Billing region code orders must carry, e.g. `MA`.
    pub region_code: String,
    /// Leading part of the export filename.
    pub filename_prefix: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            region_code: "MA".to_string(),
            filename_prefix: "ma-sales-tax".to_string(),
        }
    }
}

/// A rendered export ready to be sent as a download or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub period: ReportPeriod,
    pub filename: String,
    pub content: Vec<u8>,
}

impl CsvExport {
    pub fn content_type(&self) -> &'static str {
        CSV_CONTENT_TYPE
    }

    /// Response headers for serving the export as an uncached attachment.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", CSV_CONTENT_TYPE.to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename={}", self.filename),
            ),
            ("Pragma", "no-cache".to_string()),
            ("Expires", "0".to_string()),
        ]
    }
}

pub fn export_filename(prefix: &str, period: &ReportPeriod) -> String {
    format!("{}-q{}-{}.csv", prefix, period.quarter, period.year)
}

/// Entry point for the display and export use cases.
///
/// Holds no per-request state; each call re-reads the order store.
pub struct ReportService<S: OrderStore> {
    store: S,
    settings: ReportSettings,
}

impl<S: OrderStore> ReportService<S> {
    pub fn new(store: S, settings: ReportSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub fn build_report(&self, period: &ReportPeriod) -> Result<Report> {
        aggregator::aggregate(
            period.quarter,
            period.year,
            &self.settings.region_code,
            &self.store,
        )
    }

    /// Builds the report for the requested period and hands it to `presenter`.
    /// Missing quarter or year default to the current one.
    pub fn display<P: ReportPresenter>(
        &self,
        quarter: Option<u32>,
        year: Option<i32>,
        presenter: &mut P,
    ) -> Result<Report> {
        let period = self.period_for(quarter, year);
        tracing::info!("📊 Building {} report for {}", self.settings.region_code, period);

        let report = self.build_report(&period)?;
        presenter.present(&period, &report)?;
        Ok(report)
    }

    pub fn export(&self, quarter: Option<u32>, year: Option<i32>) -> Result<CsvExport> {
        let period = self.period_for(quarter, year);
        tracing::info!("📄 Exporting {} report for {}", self.settings.region_code, period);

        let report = self.build_report(&period)?;
        let content = csv_renderer::render(&report)?;

        Ok(CsvExport {
            period,
            filename: export_filename(&self.settings.filename_prefix, &period),
            content,
        })
    }

    fn period_for(&self, quarter: Option<u32>, year: Option<i32>) -> ReportPeriod {
        ReportPeriod::or_default(quarter, year, today())
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
