//! Instants, epoch conversions and ISO-8601

use crate::{DateError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

pub fn get_now() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds since the epoch
pub fn get_ms(date: Option<&DateTime<Utc>>) -> i64 {
    date.copied().unwrap_or_else(get_now).timestamp_millis()
}

/// Whole seconds since the epoch
pub fn get_unix(date: Option<&DateTime<Utc>>) -> i64 {
    ms_to_unix(get_ms(date))
}

/// Truncates toward zero.
pub fn ms_to_unix(ms: i64) -> i64 {
    ms / 1000
}

pub fn from_ms(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
}

/// UTC ISO-8601 with millisecond precision, e.g. `2024-03-15T11:00:00.000Z`
pub fn get_iso(date: Option<&DateTime<Utc>>) -> String {
    date.copied()
        .unwrap_or_else(get_now)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Milliseconds elapsed since `ms`
pub fn get_ms_offset(ms: i64) -> i64 {
    get_ms(None) - ms
}

/// Accepts RFC 3339 with any offset, a local `YYYY-MM-DDTHH:MM:SS[.fff]`
/// (read as UTC) or a bare `YYYY-MM-DD`.
pub fn parse_iso(iso: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(iso) {
        return Ok(date.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DateError::InvalidIso(iso.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearMonthDay {
    /// `20240315`
    Compact(i64),
    /// `2024-03-15`
    Dashed(String),
}

impl fmt::Display for YearMonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact(n) => write!(f, "{}", n),
            Self::Dashed(s) => f.write_str(s),
        }
    }
}

pub fn get_year_month_day(date: Option<&DateTime<Utc>>, with_dashes: bool) -> YearMonthDay {
    let date = date.copied().unwrap_or_else(get_now);

    if with_dashes {
        YearMonthDay::Dashed(date.format("%Y-%m-%d").to_string())
    } else {
        YearMonthDay::Compact(
            i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day()),
        )
    }
}
