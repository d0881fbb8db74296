//! Trading-calendar oracle: is a given date a session on a named exchange?

pub mod lse;
pub mod nyse;
pub mod rules;

use chrono::{Duration, NaiveDate};
use thiserror::Error;

pub use lse::LseCalendar;
pub use nyse::NyseCalendar;

/// Calendar names accepted by [`get_calendar`], canonical codes first.
pub const AVAILABLE_CALENDARS: &[&str] = &["XNYS", "XNAS", "XLON", "24/7", "24/5"];

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("unknown calendar '{name}' (available: {})", AVAILABLE_CALENDARS.join(", "))]
    UnknownCalendar { name: String },
}

/// An exchange calendar.
pub trait TradingCalendar: Send + Sync {
    /// Canonical calendar code, e.g. `XNYS`.
    fn name(&self) -> &str;

    /// True if the exchange holds a regular session on `date`.
    fn is_session(&self, date: NaiveDate) -> bool;

    /// Closest session strictly before `date`, looking back at most a year.
    fn previous_session(&self, date: NaiveDate) -> Option<NaiveDate> {
        (1..=366)
            .map(|back| date - Duration::days(back))
            .find(|d| self.is_session(*d))
    }

    /// All sessions in `[start, end]`.
    fn sessions_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.is_session(*d))
            .collect()
    }
}

/// Open every day.
#[derive(Debug, Clone, Default)]
pub struct AlwaysOpen;

impl TradingCalendar for AlwaysOpen {
    fn name(&self) -> &str {
        "24/7"
    }

    fn is_session(&self, _date: NaiveDate) -> bool {
        true
    }
}

/// Open Monday to Friday, no holidays.
#[derive(Debug, Clone, Default)]
pub struct Weekdays;

impl TradingCalendar for Weekdays {
    fn name(&self) -> &str {
        "24/5"
    }

    fn is_session(&self, date: NaiveDate) -> bool {
        !rules::is_weekend(date)
    }
}

/// Resolve a calendar by exchange code or common alias (case-insensitive).
pub fn get_calendar(name: &str) -> Result<Box<dyn TradingCalendar>, CalendarError> {
    let calendar: Box<dyn TradingCalendar> = match name.trim().to_ascii_uppercase().as_str() {
        "XNYS" | "NYSE" => Box::new(NyseCalendar::xnys()),
        "XNAS" | "NASDAQ" => Box::new(NyseCalendar::xnas()),
        "XLON" | "LSE" => Box::new(LseCalendar),
        "24/7" => Box::new(AlwaysOpen),
        "24/5" => Box::new(Weekdays),
        _ => {
            return Err(CalendarError::UnknownCalendar {
                name: name.to_string(),
            })
        }
    };
    Ok(calendar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn resolves_codes_and_aliases() {
        assert_eq!(get_calendar("XNYS").unwrap().name(), "XNYS");
        assert_eq!(get_calendar("nyse").unwrap().name(), "XNYS");
        assert_eq!(get_calendar("Nasdaq").unwrap().name(), "XNAS");
        assert_eq!(get_calendar("LSE").unwrap().name(), "XLON");
        assert_eq!(get_calendar("24/5").unwrap().name(), "24/5");
    }

    #[test]
    fn unknown_calendar_lists_available() {
        let err = get_calendar("XMOON").err().unwrap();
        let msg = err.to_string();
        assert!(msg.contains("XMOON"));
        assert!(msg.contains("XNYS"));
    }

    #[test]
    fn previous_session_skips_weekend_and_holiday() {
        let cal = get_calendar("XNYS").unwrap();
        // Tuesday after Labor Day 2024 → previous session is Friday Aug 30
        assert_eq!(cal.previous_session(d("2024-09-03")), Some(d("2024-08-30")));
    }

    #[test]
    fn simple_calendars() {
        let saturday = d("2024-01-06");
        assert!(AlwaysOpen.is_session(saturday));
        assert!(!Weekdays.is_session(saturday));
        assert_eq!(
            Weekdays.sessions_in_range(d("2024-01-05"), d("2024-01-08")),
            vec![d("2024-01-05"), d("2024-01-08")]
        );
    }
}
