//! FactorLab CLI: the session data recorder.
//!
//! Commands:
//! - `bulk <symbol> [start] [end]` replaces the stock table with one symbol's rows
//! - `last <symbol> <calendar>` appends today's rows when today is a session

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use factorlab_core::config::AppConfig;
use factorlab_core::data::{resolve_range, YahooProvider};
use factorlab_core::recorder::{Recorder, SessionOutcome};
use factorlab_core::store::StockStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const USAGE_HINT: &str = "Enter bulk or last";

#[derive(Debug, Parser)]
#[command(
    name = "factorlab",
    version,
    about = "FactorLab recorder: save daily stock rows to SQLite"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to ./factorlab.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file. Overrides the config and FACTORLAB_DB.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replace the stock table with one symbol's rows for a date range.
    Bulk {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,
        /// Start date (YYYY-MM-DD). Defaults to one year before the end date.
        start_date: Option<String>,
        /// End date (YYYY-MM-DD), inclusive. Defaults to today.
        end_date: Option<String>,
    },
    /// Append today's rows if today is a session on the given calendar.
    Last {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,
        /// Calendar name: XNYS, XNAS, XLON, 24/7, 24/5.
        calendar_name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if is_command_error(e.kind()) => {
            e.print().ok();
            println!("{USAGE_HINT}");
            return Ok(());
        }
        Err(e) => e.exit(),
    };

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.store.path = db;
    }

    let provider = YahooProvider::new(config.provider.clone())?;
    let mut store = StockStore::open(&config.store.path, &config.store.table)
        .with_context(|| format!("opening store {}", config.store.path.display()))?;
    let mut recorder = Recorder::new(&provider, &mut store);
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Bulk {
            symbol,
            start_date,
            end_date,
        } => {
            let (start, end) = bulk_range(start_date.as_deref(), end_date.as_deref(), today)?;
            recorder.bulk(&symbol, start, end)?;
            println!("{symbol} saved between {start} and {end}");
        }
        Commands::Last {
            symbol,
            calendar_name,
        } => {
            match recorder.last(&symbol, &calendar_name, today)? {
                SessionOutcome::Appended { .. } => println!("{symbol} saved"),
                SessionOutcome::NotTradingDay { date } => {
                    println!("{date} is not a trading day. Doing nothing!")
                }
            }
        }
    }

    Ok(())
}

/// Parse errors that mean "no usable subcommand" rather than a bad argument.
fn is_command_error(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::InvalidSubcommand
            | ErrorKind::MissingSubcommand
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

/// Bulk range from optional arguments, falling back to the provider's default year.
fn bulk_range(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let start = start.map(parse_date).transpose()?;
    let end = end.map(parse_date).transpose()?;
    Ok(resolve_range(start, end, today)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bulk_with_global_flags() {
        let cli = Cli::try_parse_from([
            "factorlab", "bulk", "AAPL", "2024-01-01", "2024-06-30", "--db", "x.db",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        match cli.command {
            Commands::Bulk {
                symbol,
                start_date,
                end_date,
            } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(start_date.as_deref(), Some("2024-01-01"));
                assert_eq!(end_date.as_deref(), Some("2024-06-30"));
            }
            other => panic!("expected bulk, got {other:?}"),
        }
    }

    #[test]
    fn parses_last() {
        let cli = Cli::try_parse_from(["factorlab", "last", "MSFT", "XNYS"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Last { ref calendar_name, .. } if calendar_name == "XNYS"
        ));
    }

    #[test]
    fn unknown_and_missing_commands_get_the_hint() {
        let unknown = Cli::try_parse_from(["factorlab", "fetch", "AAPL"]).unwrap_err();
        assert!(is_command_error(unknown.kind()));

        let missing = Cli::try_parse_from(["factorlab"]).unwrap_err();
        assert!(is_command_error(missing.kind()));
    }

    #[test]
    fn missing_arguments_are_not_command_errors() {
        let err = Cli::try_parse_from(["factorlab", "last", "AAPL"]).unwrap_err();
        assert!(!is_command_error(err.kind()));
    }

    #[test]
    fn bulk_dates_are_optional() {
        let cli = Cli::try_parse_from(["factorlab", "bulk", "AAPL"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Bulk { start_date: None, end_date: None, .. }
        ));

        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let (start, end) = bulk_range(None, None, today).unwrap();
        assert_eq!(end, today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());

        let (start, end) = bulk_range(Some("2024-01-02"), Some("2024-03-01"), today).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn inverted_bulk_range_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert!(bulk_range(Some("2024-03-01"), Some("2024-01-02"), today).is_err());
        assert!(bulk_range(Some("2024-13-01"), None, today).is_err());
    }

    #[test]
    fn bad_dates_are_rejected() {
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("01/02/2024").is_err());
        assert!(parse_date(" 2024-02-29 ").is_ok());
    }
}
