//! Date and time helpers for Kitbag
//!
//! Instants are `chrono::DateTime<Utc>`. Functions taking an
//! `Option<&DateTime<Utc>>` fall back to the current time.

pub mod duration;
pub mod human;
pub mod instant;
pub mod locale;
pub mod zone;

pub use chrono::{DateTime, Utc};
pub use duration::format_duration;
pub use human::{get_date_hour_minutes, get_full_relative_time, get_relative, relative_to, DisplayOptions};
pub use instant::{
    from_ms, get_iso, get_ms, get_ms_offset, get_now, get_unix, get_year_month_day, ms_to_unix,
    parse_iso, YearMonthDay,
};
pub use locale::{Locale, Unit};
pub use zone::{to_local, Zone, Zoned};

use thiserror::Error;

pub const DEFAULT_TIMEZONE: &str = "Europe/Amsterdam";
pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid ISO-8601 date: {0}")]
    InvalidIso(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

pub type Result<T> = std::result::Result<T, DateError>;
