//! Multi-symbol close alignment.
//!
//! Given bars for multiple symbols, pivot their closes onto a common
//! timeline with one column per symbol. Missing closes stay NaN (no
//! forward-fill).

use super::provider::{DataError, DataProvider, RawBar};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Closes for several symbols on a shared, ascending date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    /// The common date axis (sorted ascending, unique).
    pub dates: Vec<NaiveDate>,
    /// Column names, sorted.
    pub symbols: Vec<String>,
    /// One column per symbol, each the same length as `dates`.
    pub closes: Vec<Vec<f64>>,
}

impl PriceTable {
    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Pivot per-symbol bars into a [`PriceTable`].
///
/// The date axis is the union of all symbols' dates. A symbol without a bar
/// on a date gets NaN. Duplicate dates within one symbol keep the last bar.
pub fn align_closes(symbol_bars: HashMap<String, Vec<RawBar>>) -> PriceTable {
    // Collect the union of all dates
    let mut all_dates = BTreeSet::new();
    for bars in symbol_bars.values() {
        for bar in bars {
            all_dates.insert(bar.date);
        }
    }
    let dates: Vec<NaiveDate> = all_dates.into_iter().collect();

    // BTreeMap gives sorted columns
    let ordered: BTreeMap<String, Vec<RawBar>> = symbol_bars.into_iter().collect();
    let mut symbols = Vec::with_capacity(ordered.len());
    let mut closes = Vec::with_capacity(ordered.len());

    for (symbol, bars) in ordered {
        let by_date: HashMap<NaiveDate, f64> = bars.iter().map(|b| (b.date, b.close)).collect();
        let column = dates
            .iter()
            .map(|date| by_date.get(date).copied().unwrap_or(f64::NAN))
            .collect();
        symbols.push(symbol);
        closes.push(column);
    }

    PriceTable {
        dates,
        symbols,
        closes,
    }
}

/// Fetch every symbol over `[start, end]` and pivot the closes.
///
/// Fails on the first provider error. A symbol that comes back with no rows
/// fails with [`DataError::EmptyRange`].
pub fn fetch_closes(
    provider: &dyn DataProvider,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceTable, DataError> {
    let mut symbol_bars = HashMap::with_capacity(symbols.len());
    for symbol in symbols {
        let result = provider.fetch(symbol, start, end)?;
        if result.bars.is_empty() {
            return Err(DataError::EmptyRange {
                symbol: symbol.clone(),
                start,
                end,
            });
        }
        symbol_bars.insert(symbol.clone(), result.bars);
    }
    Ok(align_closes(symbol_bars))
}
