//! SQLite storage for recorded stock rows.
//!
//! One table, not partitioned by symbol. `Replace` drops and recreates it,
//! so a bulk load for one symbol erases every other symbol's rows too.

use crate::domain::StockRow;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_TABLE: &str = "stock_data";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid table name '{0}'")]
    InvalidTableName(String),

    #[error("corrupt row {rowid}: {reason}")]
    CorruptRow { rowid: i64, reason: String },
}

/// rowid, date, open, high, low, close, volume, symbol
type RawRow = (
    i64,
    String,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<i64>,
    String,
);

/// How a write treats rows already in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Drop and recreate the table, then insert.
    Replace,
    /// Create the table if missing, then insert. Existing rows stay, duplicates included.
    Append,
}

/// A connection to the local market-data file plus the target table.
pub struct StockStore {
    conn: Connection,
    table: String,
}

fn validate_table(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(name.to_string()))
    }
}

impl StockStore {
    /// Open (or create) the database file.
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self, StoreError> {
        validate_table(table)?;
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    pub fn open_in_memory(table: &str) -> Result<Self, StoreError> {
        validate_table(table)?;
        Ok(Self {
            conn: Connection::open_in_memory()?,
            table: table.to_string(),
        })
    }

    fn create_sql(&self, if_not_exists: bool) -> String {
        format!(
            "CREATE TABLE {}\"{}\" (
                date TEXT NOT NULL,
                open REAL,
                high REAL,
                low REAL,
                close REAL,
                volume INTEGER,
                symbol TEXT NOT NULL
            )",
            if if_not_exists { "IF NOT EXISTS " } else { "" },
            self.table
        )
    }

    /// Write rows in one transaction. Returns the number of rows inserted.
    pub fn write(&mut self, rows: &[StockRow], mode: WriteMode) -> Result<usize, StoreError> {
        let create = self.create_sql(mode == WriteMode::Append);
        let insert = format!(
            "INSERT INTO \"{}\" (date, open, high, low, close, volume, symbol)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            self.table
        );
        let drop_sql = format!("DROP TABLE IF EXISTS \"{}\"", self.table);

        let tx = self.conn.transaction()?;
        if mode == WriteMode::Replace {
            tx.execute(&drop_sql, [])?;
        }
        tx.execute(&create, [])?;

        {
            let mut stmt = tx.prepare(&insert)?;
            for row in rows {
                stmt.execute(params![
                    row.date.format("%Y-%m-%d").to_string(),
                    finite(row.open),
                    finite(row.high),
                    finite(row.low),
                    finite(row.close),
                    i64::try_from(row.volume).unwrap_or(i64::MAX),
                    row.symbol,
                ])?;
            }
        }
        tx.commit()?;

        tracing::info!(table = %self.table, rows = rows.len(), ?mode, "wrote stock rows");
        Ok(rows.len())
    }

    fn exists(&self) -> Result<bool, StoreError> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [&self.table],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Every row in insertion order. A missing table reads as empty.
    pub fn read_all(&self) -> Result<Vec<StockRow>, StoreError> {
        self.read_where(None)
    }

    /// Rows for one symbol in insertion order.
    pub fn read_symbol(&self, symbol: &str) -> Result<Vec<StockRow>, StoreError> {
        self.read_where(Some(symbol))
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        if !self.exists()? {
            return Ok(0);
        }
        let n: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    fn read_where(&self, symbol: Option<&str>) -> Result<Vec<StockRow>, StoreError> {
        if !self.exists()? {
            return Ok(Vec::new());
        }
        let mut sql = format!(
            "SELECT rowid, date, open, high, low, close, volume, symbol FROM \"{}\"",
            self.table
        );
        if symbol.is_some() {
            sql.push_str(" WHERE symbol = ?1");
        }
        sql.push_str(" ORDER BY rowid");

        let mut stmt = self.conn.prepare(&sql)?;
        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<RawRow> {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<f64>>(2)?,
                row.get::<_, Option<f64>>(3)?,
                row.get::<_, Option<f64>>(4)?,
                row.get::<_, Option<f64>>(5)?,
                row.get::<_, Option<i64>>(6)?,
                row.get::<_, String>(7)?,
            ))
        };
        let raw = match symbol {
            Some(s) => stmt.query_map([s], map_row)?.collect::<Result<Vec<_>, _>>()?,
            None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
        };

        raw.into_iter()
            .map(|(rowid, date, open, high, low, close, volume, symbol)| {
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                    StoreError::CorruptRow {
                        rowid,
                        reason: format!("bad date '{date}': {e}"),
                    }
                })?;
                Ok(StockRow {
                    date,
                    open: open.unwrap_or(f64::NAN),
                    high: high.unwrap_or(f64::NAN),
                    low: low.unwrap_or(f64::NAN),
                    close: close.unwrap_or(f64::NAN),
                    volume: volume.and_then(|v| u64::try_from(v).ok()).unwrap_or(0),
                    symbol,
                })
            })
            .collect()
    }
}

/// NaN cannot be stored as REAL; it goes in as NULL.
fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(symbol: &str, date: &str, close: f64) -> StockRow {
        StockRow {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1_000,
            symbol: symbol.into(),
        }
    }

    #[test]
    fn rejects_bad_table_names() {
        assert!(matches!(
            StockStore::open_in_memory("stock data; DROP"),
            Err(StoreError::InvalidTableName(_))
        ));
        assert!(StockStore::open_in_memory("1abc").is_err());
        assert!(StockStore::open_in_memory("_prices_2").is_ok());
    }

    #[test]
    fn missing_table_reads_empty() {
        let store = StockStore::open_in_memory(DEFAULT_TABLE).unwrap();
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn replace_drops_everything() {
        let mut store = StockStore::open_in_memory(DEFAULT_TABLE).unwrap();
        store
            .write(&[row("MSFT", "2024-01-02", 370.0)], WriteMode::Append)
            .unwrap();
        store
            .write(&[row("AAPL", "2024-01-02", 185.0)], WriteMode::Replace)
            .unwrap();

        let rows = store.read_all().unwrap();
        assert_eq!(rows, vec![row("AAPL", "2024-01-02", 185.0)]);
    }

    #[test]
    fn replace_with_nothing_truncates() {
        let mut store = StockStore::open_in_memory(DEFAULT_TABLE).unwrap();
        store
            .write(&[row("AAPL", "2024-01-02", 185.0)], WriteMode::Append)
            .unwrap();
        assert_eq!(store.write(&[], WriteMode::Replace).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn append_keeps_duplicates() {
        let mut store = StockStore::open_in_memory(DEFAULT_TABLE).unwrap();
        let r = row("AAPL", "2024-01-02", 185.0);
        store.write(&[r.clone()], WriteMode::Append).unwrap();
        store.write(&[r.clone()], WriteMode::Append).unwrap();
        assert_eq!(store.read_symbol("AAPL").unwrap(), vec![r.clone(), r]);
        assert!(store.read_symbol("MSFT").unwrap().is_empty());
    }

    #[test]
    fn replace_then_append_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("market_data.sqlite");
        {
            let mut store = StockStore::open(&path, DEFAULT_TABLE).unwrap();
            assert_eq!(
                store
                    .write(&[row("AAPL", "2024-01-02", 185.0)], WriteMode::Replace)
                    .unwrap(),
                1
            );
            store
                .write(&[row("AAPL", "2024-01-03", 184.0)], WriteMode::Append)
                .unwrap();
        }

        let store = StockStore::open(&path, DEFAULT_TABLE).unwrap();
        let closes: Vec<f64> = store.read_all().unwrap().iter().map(|r| r.close).collect();
        assert_eq!(closes, vec![185.0, 184.0]);
    }

    #[test]
    fn nan_round_trips_through_null() {
        let mut store = StockStore::open_in_memory(DEFAULT_TABLE).unwrap();
        let mut r = row("AAPL", "2024-01-02", 185.0);
        r.open = f64::NAN;
        store.write(&[r], WriteMode::Append).unwrap();

        let back = store.read_all().unwrap();
        assert!(back[0].open.is_nan());
        assert_eq!(back[0].close, 185.0);
    }
}
