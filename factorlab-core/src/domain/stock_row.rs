//! StockRow — one stored daily record for one symbol.

use crate::data::RawBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV row tagged with its symbol, as written to the local store.
///
/// Rows are created per fetch and written once; nothing mutates them after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub symbol: String,
}

impl StockRow {
    /// Tag a provider bar with the symbol it was fetched for.
    pub fn from_bar(symbol: &str, bar: RawBar) -> Self {
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            symbol: symbol.to_string(),
        }
    }
}

/// Tag every bar of a fetch with `symbol`.
pub fn tag_rows(symbol: &str, bars: Vec<RawBar>) -> Vec<StockRow> {
    bars.into_iter().map(|b| StockRow::from_bar(symbol, b)).collect()
}
