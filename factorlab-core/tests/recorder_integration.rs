//! Integration tests for the session recorder against an on-disk SQLite file.

use chrono::{Duration, NaiveDate};
use factorlab_core::data::{MemoryProvider, RawBar};
use factorlab_core::recorder::{Recorder, SessionOutcome};
use factorlab_core::store::{StockStore, DEFAULT_TABLE};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// One bar per calendar day in `[start, start + days)`, weekends included.
fn daily_bars(start: &str, days: i64, base: f64) -> Vec<RawBar> {
    (0..days)
        .map(|i| {
            let close = base + i as f64;
            RawBar {
                date: d(start) + Duration::days(i),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000 + i as u64,
            }
        })
        .collect()
}

fn provider() -> MemoryProvider {
    MemoryProvider::new()
        .with_bars("AAPL", daily_bars("2024-01-01", 31, 180.0))
        .with_bars("MSFT", daily_bars("2024-01-01", 31, 370.0))
}

#[test]
fn bulk_read_back_matches_provider_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("market.db");
    let provider = provider();

    {
        let mut store = StockStore::open(&db, DEFAULT_TABLE).unwrap();
        let mut recorder = Recorder::new(&provider, &mut store);
        recorder.bulk("MSFT", d("2024-01-01"), d("2024-01-31")).unwrap();
        recorder.bulk("AAPL", d("2024-01-02"), d("2024-01-05")).unwrap();
    }

    // Reopen to prove the rows were committed to disk
    let store = StockStore::open(&db, DEFAULT_TABLE).unwrap();
    let rows = store.read_all().unwrap();
    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![d("2024-01-02"), d("2024-01-03"), d("2024-01-04"), d("2024-01-05")]
    );
    assert!(rows.iter().all(|r| r.symbol == "AAPL"));
    assert_eq!(rows[0].close, 181.0);
    assert_eq!(rows[0].volume, 1_001);
}

#[test]
fn last_on_weekend_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let provider = provider();
    let mut store = StockStore::open(dir.path().join("market.db"), DEFAULT_TABLE).unwrap();

    let outcome = Recorder::new(&provider, &mut store)
        .last("AAPL", "XNYS", d("2024-01-13"))
        .unwrap();

    assert_eq!(outcome, SessionOutcome::NotTradingDay { date: d("2024-01-13") });
    assert_eq!(store.count().unwrap(), 0);
    assert_eq!(provider.calls(), 0);
}

#[test]
fn last_on_holiday_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let provider = provider();
    let mut store = StockStore::open(dir.path().join("market.db"), DEFAULT_TABLE).unwrap();

    // MLK Day 2024
    let outcome = Recorder::new(&provider, &mut store)
        .last("AAPL", "XNAS", d("2024-01-15"))
        .unwrap();

    assert!(matches!(outcome, SessionOutcome::NotTradingDay { .. }));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn last_twice_duplicates_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let provider = provider();
    let mut store = StockStore::open(dir.path().join("market.db"), DEFAULT_TABLE).unwrap();
    let session = d("2024-01-16");

    {
        let mut recorder = Recorder::new(&provider, &mut store);
        for _ in 0..2 {
            let outcome = recorder.last("AAPL", "XNYS", session).unwrap();
            assert_eq!(
                outcome,
                SessionOutcome::Appended {
                    date: session,
                    rows: 1
                }
            );
        }
    }

    let rows = store.read_symbol("AAPL").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], rows[1]);
    assert_eq!(rows[0].date, session);
}

#[test]
fn last_appends_after_bulk() {
    let dir = tempfile::tempdir().unwrap();
    let provider = provider();
    let mut store = StockStore::open(dir.path().join("market.db"), "prices").unwrap();

    {
        let mut recorder = Recorder::new(&provider, &mut store);
        recorder.bulk("AAPL", d("2024-01-02"), d("2024-01-12")).unwrap();
        recorder.last("MSFT", "24/7", d("2024-01-13")).unwrap();
    }

    assert_eq!(store.read_symbol("AAPL").unwrap().len(), 11);
    assert_eq!(store.read_symbol("MSFT").unwrap().len(), 1);
    assert_eq!(store.count().unwrap(), 12);
}
