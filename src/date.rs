use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Error, Result};

static MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})$").unwrap());
static DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

const MIN_YEAR: u16 = 1900;
const MAX_YEAR: u16 = 2100;

/// A blog publish date (`YYYY-MM`). Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: u16,
    pub month: u8,
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parse `YYYY-MM` with year in 1900..=2100 and month in 1..=12.
pub fn parse_year_month(s: &str) -> Option<YearMonth> {
    let caps = MONTH_RE.captures(s)?;
    let year: u16 = caps[1].parse().ok()?;
    let month: u8 = caps[2].parse().ok()?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
        return None;
    }
    Some(YearMonth { year, month })
}

/// Parse `YYYY-MM-DD` as a real calendar date.
pub fn parse_event_date(s: &str) -> Option<NaiveDate> {
    if !DAY_RE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn validate_year_month(s: &str) -> Result<YearMonth> {
    parse_year_month(s).ok_or(Error::InvalidDate {
        expected: "YYYY-MM",
        example: "2024-01",
    })
}

pub fn validate_event_date(s: &str) -> Result<NaiveDate> {
    parse_event_date(s).ok_or(Error::InvalidDate {
        expected: "YYYY-MM-DD",
        example: "2024-06-15",
    })
}
