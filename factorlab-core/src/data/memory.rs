//! In-memory data provider for tests and offline runs.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves bars from a map keyed by symbol, filtered to the requested range.
///
/// Symbols that were never inserted behave like an unknown ticker.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    bars: HashMap<String, Vec<RawBar>>,
    calls: AtomicUsize,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bars for a symbol. Bars are kept sorted by date.
    pub fn with_bars(mut self, symbol: &str, mut bars: Vec<RawBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    /// Number of `fetch` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DataProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if start > end {
            return Err(DataError::InvalidRange { start, end });
        }
        let bars = self
            .bars
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect();

        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::Memory,
        })
    }
}
