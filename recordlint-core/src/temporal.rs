//! Date parsing and calendar arithmetic.
//!
//! Every detector that reasons about ages or durations goes through this
//! module so they all agree on the length of a year.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Length of a year in days used for all age and duration arithmetic.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// ISO calendar date, optionally followed by a time of day that is ignored.
///
/// Covers RFC 3339 timestamps such as `2020-03-15T08:30:00Z`.
static ISO_DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$")
        .expect("Invalid ISO date regex")
});

/// Non-ISO layouts, tried in order. US month-first.
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y"];

/// Parses a cell as a calendar date.
///
/// Only string cells are considered; anything unparseable yields `None` so
/// callers can exclude it from their analysis.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s),
        _ => None,
    }
}

/// Parses a date string in one of the accepted layouts.
pub fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(captures) = ISO_DATE_PREFIX.captures(trimmed) {
        let year = captures[1].parse().ok()?;
        let month = captures[2].parse().ok()?;
        let day = captures[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Elapsed years between two dates, negative when `to` precedes `from`.
pub fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

/// Returns true if the date falls on January 1st of any year.
pub fn is_new_years_day(date: NaiveDate) -> bool {
    date.month() == 1 && date.day() == 1
}

/// A calendar month, used to bucket events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// Calendar year
    pub year: i32,
    /// Month number (1-12)
    pub month: u32,
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Rounds to a fixed number of decimal places, ties to even.
///
/// `round_to(0.125, 2)` is `0.12` and `round_to(6.25, 1)` is `6.2`.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
