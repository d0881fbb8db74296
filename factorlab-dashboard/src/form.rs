//! Form marshaling: raw page inputs into a typed `AnalysisRequest`.

use crate::error::DashboardError;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use factorlab_core::analysis::AnalysisRequest;
use factorlab_core::config::DashboardConfig;
use serde::Deserialize;

/// Body of `POST /api/update`, as sent by the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    pub tickers: String,
    pub n_components: Option<usize>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Comma-split, trimmed, upper-cased, blanks dropped.
pub fn parse_tickers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_ascii_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Accepts `YYYY-MM-DD` or a date-time such as `2024-01-02T00:00:00.000`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

fn date_field(
    name: &str,
    raw: Option<&str>,
    default: NaiveDate,
) -> Result<NaiveDate, DashboardError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => parse_date(s)
            .ok_or_else(|| DashboardError::BadRequest(format!("invalid {name} '{s}'"))),
    }
}

impl UpdateForm {
    /// Build the analyzer request. `None` when no tickers were entered.
    pub fn into_request(
        self,
        defaults: &DashboardConfig,
        today: NaiveDate,
    ) -> Result<Option<AnalysisRequest>, DashboardError> {
        let tickers = parse_tickers(&self.tickers);
        if tickers.is_empty() {
            return Ok(None);
        }

        let end_date = date_field("end_date", self.end_date.as_deref(), today)?;
        let start_date = date_field(
            "start_date",
            self.start_date.as_deref(),
            end_date - Duration::days(defaults.lookback_days),
        )?;
        if start_date > end_date {
            return Err(DashboardError::BadRequest(format!(
                "start_date {start_date} is after end_date {end_date}"
            )));
        }

        Ok(Some(AnalysisRequest {
            tickers,
            n_components: self.n_components.unwrap_or(defaults.default_components),
            start_date,
            end_date,
        }))
    }
}
