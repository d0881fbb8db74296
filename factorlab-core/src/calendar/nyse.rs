//! New York Stock Exchange sessions (also used for Nasdaq).
//!
//! Rules cover the holiday schedule in force since 1998, when MLK Day was
//! added. New Year's Day falling on a Saturday is not observed.

use super::rules::{easter_sunday, is_weekend, last_weekday, nearest_weekday, nth_weekday};
use super::TradingCalendar;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Unscheduled full-day closures.
const SPECIAL_CLOSURES: &[(i32, u32, u32)] = &[
    (2001, 9, 11),
    (2001, 9, 12),
    (2001, 9, 13),
    (2001, 9, 14),
    (2004, 6, 11),
    (2007, 1, 2),
    (2012, 10, 29),
    (2012, 10, 30),
    (2018, 12, 5),
    (2025, 1, 9),
];

#[derive(Debug, Clone)]
pub struct NyseCalendar {
    name: &'static str,
}

impl NyseCalendar {
    pub fn xnys() -> Self {
        Self { name: "XNYS" }
    }

    pub fn xnas() -> Self {
        Self { name: "XNAS" }
    }
}

/// Full-day holidays for one year.
pub fn holidays(year: i32) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(10);

    if let Some(new_year) = NaiveDate::from_ymd_opt(year, 1, 1) {
        match new_year.weekday() {
            Weekday::Sat => {}
            Weekday::Sun => days.push(new_year + Duration::days(1)),
            _ => days.push(new_year),
        }
    }
    if year >= 1998 {
        days.extend(nth_weekday(year, 1, Weekday::Mon, 3));
    }
    days.extend(nth_weekday(year, 2, Weekday::Mon, 3));
    days.extend(easter_sunday(year).map(|e| e - Duration::days(2)));
    days.extend(last_weekday(year, 5, Weekday::Mon));
    if year >= 2022 {
        days.extend(NaiveDate::from_ymd_opt(year, 6, 19).map(nearest_weekday));
    }
    days.extend(NaiveDate::from_ymd_opt(year, 7, 4).map(nearest_weekday));
    days.extend(nth_weekday(year, 9, Weekday::Mon, 1));
    days.extend(nth_weekday(year, 11, Weekday::Thu, 4));
    days.extend(NaiveDate::from_ymd_opt(year, 12, 25).map(nearest_weekday));

    days.extend(
        SPECIAL_CLOSURES
            .iter()
            .filter(|(y, _, _)| *y == year)
            .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
    );
    days.sort();
    days
}

impl TradingCalendar for NyseCalendar {
    fn name(&self) -> &str {
        self.name
    }

    fn is_session(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !holidays(date.year()).contains(&date)
    }
}
