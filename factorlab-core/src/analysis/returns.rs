//! Daily percentage returns from aligned closes.

use crate::data::PriceTable;
use chrono::NaiveDate;

/// Rectangular matrix of day-over-day returns, one column per symbol.
///
/// Every cell is finite. Rows where any symbol's return is undefined
/// (the first row, or a gap on either side of the change) are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnMatrix {
    /// Date of each kept row (the later day of each change).
    pub dates: Vec<NaiveDate>,
    pub symbols: Vec<String>,
    /// Row-major: `rows[t][j]` is the return of `symbols[j]` on `dates[t]`.
    pub rows: Vec<Vec<f64>>,
    /// Rows of the source table that produced at least one undefined return.
    pub undefined_rows: usize,
}

impl ReturnMatrix {
    /// `close[t] / close[t - 1] - 1` per column, keeping only fully defined rows.
    pub fn from_prices(prices: &PriceTable) -> Self {
        let n = prices.row_count();
        let mut dates = Vec::with_capacity(n.saturating_sub(1));
        let mut rows = Vec::with_capacity(n.saturating_sub(1));

        for t in 1..n {
            let row: Vec<f64> = prices
                .closes
                .iter()
                .map(|col| col[t] / col[t - 1] - 1.0)
                .collect();
            if row.iter().all(|r| r.is_finite()) {
                dates.push(prices.dates[t]);
                rows.push(row);
            }
        }

        Self {
            undefined_rows: n - rows.len(),
            dates,
            symbols: prices.symbols.clone(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
