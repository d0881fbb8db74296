//! Session data recorder: bulk loads and last-session appends.

use crate::calendar::{get_calendar, CalendarError};
use crate::data::{DataError, DataProvider};
use crate::domain::{tag_rows, StockRow};
use crate::store::{StockStore, StoreError, WriteMode};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Result of a `last` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// `date` was a session; `rows` rows were appended.
    Appended { date: NaiveDate, rows: usize },
    /// `date` was not a session; nothing was fetched or written.
    NotTradingDay { date: NaiveDate },
}

/// Fetches rows from a provider and writes them to the store.
pub struct Recorder<'a> {
    provider: &'a dyn DataProvider,
    store: &'a mut StockStore,
}

impl<'a> Recorder<'a> {
    pub fn new(provider: &'a dyn DataProvider, store: &'a mut StockStore) -> Self {
        Self { provider, store }
    }

    fn fetch_rows(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StockRow>, DataError> {
        let result = self.provider.fetch(symbol, start, end)?;
        Ok(tag_rows(symbol, result.bars))
    }

    /// Replace the whole table with `symbol`'s rows for `[start, end]`.
    ///
    /// Rows for every other symbol are lost. An empty fetch leaves an empty table.
    pub fn bulk(
        &mut self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<usize, RecordError> {
        let rows = self.fetch_rows(symbol, start, end)?;
        let written = self.store.write(&rows, WriteMode::Replace)?;
        tracing::info!(symbol, %start, %end, rows = written, "bulk load replaced table");
        Ok(written)
    }

    /// Append `today`'s rows for `symbol` if `today` is a session on `calendar_name`.
    ///
    /// Repeating this for an already-recorded session appends the rows again.
    pub fn last(
        &mut self,
        symbol: &str,
        calendar_name: &str,
        today: NaiveDate,
    ) -> Result<SessionOutcome, RecordError> {
        let calendar = get_calendar(calendar_name)?;
        if !calendar.is_session(today) {
            tracing::info!(
                symbol,
                calendar = calendar.name(),
                %today,
                previous = ?calendar.previous_session(today),
                "not a session, nothing recorded"
            );
            return Ok(SessionOutcome::NotTradingDay { date: today });
        }

        let rows = self.fetch_rows(symbol, today, today)?;
        let written = self.store.write(&rows, WriteMode::Append)?;
        tracing::info!(symbol, calendar = calendar.name(), %today, rows = written, "appended session");
        Ok(SessionOutcome::Appended {
            date: today,
            rows: written,
        })
    }
}
