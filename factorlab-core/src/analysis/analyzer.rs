//! Request → fetch → returns → factor model → charts.

use super::charts::FactorCharts;
use super::error::AnalyzerError;
use super::pca::FactorModel;
use super::returns::ReturnMatrix;
use crate::data::{fetch_closes, DataProvider, PriceTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One dashboard submission, already marshaled into typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub tickers: Vec<String>,
    pub n_components: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AnalysisRequest {
    /// Tickers with blanks removed and duplicates dropped, first occurrence wins.
    pub fn symbols(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.tickers.len());
        for t in &self.tickers {
            let t = t.trim();
            if !t.is_empty() && !out.iter().any(|s| s == t) {
                out.push(t.to_string());
            }
        }
        out
    }
}

/// Everything a fit produced, for callers that want more than the charts.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub prices: PriceTable,
    pub returns: ReturnMatrix,
    pub model: FactorModel,
    pub charts: FactorCharts,
}

/// Produce the three chart datasets for a request.
///
/// No tickers means three empty results and no provider call.
pub fn update(
    provider: &dyn DataProvider,
    request: &AnalysisRequest,
) -> Result<FactorCharts, AnalyzerError> {
    Ok(analyze(provider, request)?.map(|a| a.charts).unwrap_or_default())
}

/// Full pipeline. Returns `Ok(None)` when there is nothing to analyze.
pub fn analyze(
    provider: &dyn DataProvider,
    request: &AnalysisRequest,
) -> Result<Option<Analysis>, AnalyzerError> {
    let symbols = request.symbols();
    if symbols.is_empty() {
        tracing::debug!("no tickers entered, skipping analysis");
        return Ok(None);
    }

    let k = request.n_components;
    if k == 0 || k > symbols.len() {
        return Err(AnalyzerError::InvalidComponentCount {
            requested: k,
            max: symbols.len(),
        });
    }
    if k < 2 {
        return Err(AnalyzerError::ScatterNeedsTwoComponents { requested: k });
    }

    let prices = fetch_closes(provider, &symbols, request.start_date, request.end_date)?;
    let returns = ReturnMatrix::from_prices(&prices);
    tracing::info!(
        symbols = symbols.len(),
        price_rows = prices.row_count(),
        return_rows = returns.row_count(),
        "computed daily returns"
    );

    let model = FactorModel::fit(&returns, k)?;
    let charts = FactorCharts::from_model(&model)?;

    Ok(Some(Analysis {
        prices,
        returns,
        model,
        charts,
    }))
}
