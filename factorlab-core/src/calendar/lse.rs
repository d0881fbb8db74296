//! London Stock Exchange sessions: England & Wales bank holidays.

use super::rules::{easter_sunday, is_weekend, last_weekday, next_monday_if_weekend, nth_weekday};
use super::TradingCalendar;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// One-off closures (jubilees, royal events, the millennium).
const SPECIAL_CLOSURES: &[(i32, u32, u32)] = &[
    (1999, 12, 31),
    (2002, 6, 3),
    (2011, 4, 29),
    (2012, 6, 5),
    (2022, 6, 3),
    (2022, 9, 19),
    (2023, 5, 8),
];

#[derive(Debug, Clone, Default)]
pub struct LseCalendar;

fn early_may(year: i32) -> Option<NaiveDate> {
    match year {
        1995 | 2020 => NaiveDate::from_ymd_opt(year, 5, 8),
        _ => nth_weekday(year, 5, Weekday::Mon, 1),
    }
}

fn spring_bank(year: i32) -> Option<NaiveDate> {
    match year {
        2002 | 2012 => NaiveDate::from_ymd_opt(year, 6, 4),
        2022 => NaiveDate::from_ymd_opt(year, 6, 2),
        _ => last_weekday(year, 5, Weekday::Mon),
    }
}

/// Christmas and Boxing Day with their substitute days.
fn christmas_closures(year: i32) -> Vec<NaiveDate> {
    let Some(christmas) = NaiveDate::from_ymd_opt(year, 12, 25) else {
        return Vec::new();
    };
    let boxing = christmas + Duration::days(1);
    match christmas.weekday() {
        Weekday::Fri => vec![christmas, christmas + Duration::days(3)],
        Weekday::Sat => vec![christmas + Duration::days(2), christmas + Duration::days(3)],
        Weekday::Sun => vec![boxing, christmas + Duration::days(2)],
        _ => vec![christmas, boxing],
    }
}

/// Full-day holidays for one year.
pub fn holidays(year: i32) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(10);

    days.extend(NaiveDate::from_ymd_opt(year, 1, 1).map(next_monday_if_weekend));
    if let Some(easter) = easter_sunday(year) {
        days.push(easter - Duration::days(2));
        days.push(easter + Duration::days(1));
    }
    days.extend(early_may(year));
    days.extend(spring_bank(year));
    days.extend(last_weekday(year, 8, Weekday::Mon));
    days.extend(christmas_closures(year));

    days.extend(
        SPECIAL_CLOSURES
            .iter()
            .filter(|(y, _, _)| *y == year)
            .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
    );
    days.sort();
    days
}

impl TradingCalendar for LseCalendar {
    fn name(&self) -> &str {
        "XLON"
    }

    fn is_session(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !holidays(date.year()).contains(&date)
    }
}
