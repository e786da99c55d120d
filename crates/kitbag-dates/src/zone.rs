//! Timezones and zoned instants

use crate::{DateError, Result};
use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// An IANA zone (`Europe/Amsterdam`) or a fixed `UTC±HH:MM` offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Zone {
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        let unknown = || DateError::UnknownTimezone(name.to_string());

        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(Zone::Named(Tz::UTC));
        }

        if let Some(rest) = strip_utc_prefix(trimmed) {
            return parse_offset(rest).map(Zone::Fixed).ok_or_else(unknown);
        }

        trimmed.parse::<Tz>().map(Zone::Named).map_err(|_| unknown())
    }

    pub fn name(&self) -> String {
        match self {
            Zone::Named(tz) => tz.name().to_string(),
            Zone::Fixed(offset) => {
                let secs = offset.local_minus_utc();
                let sign = if secs < 0 { '-' } else { '+' };
                let secs = secs.abs();
                format!("UTC{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60)
            }
        }
    }

    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            Zone::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
            Zone::Fixed(offset) => *offset,
        }
    }

    /// The same instant expressed in this zone's wall-clock time.
    pub fn project(&self, instant: &DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset_at(instant))
    }
}

impl FromStr for Zone {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self> {
        Zone::parse(s)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn strip_utc_prefix(name: &str) -> Option<&str> {
    let prefix = name.get(..3)?;
    prefix.eq_ignore_ascii_case("utc").then(|| &name[3..])
}

// "+01:00", "-05:30", "+1"
fn parse_offset(rest: &str) -> Option<FixedOffset> {
    let (sign, digits) = match rest.as_bytes().first()? {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };

    let (hours, minutes) = digits.split_once(':').unwrap_or((digits, "0"));
    if hours.is_empty() || !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// An instant paired with the zone it is displayed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zoned {
    instant: DateTime<Utc>,
    zone: Zone,
}

impl Zoned {
    pub fn new(instant: DateTime<Utc>, zone: Zone) -> Self {
        Self { instant, zone }
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn zone_name(&self) -> String {
        self.zone.name()
    }

    pub fn local(&self) -> DateTime<FixedOffset> {
        self.zone.project(&self.instant)
    }
}

impl fmt::Display for Zoned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Reproject `date` into `zone` without changing the instant.
pub fn to_local(date: &DateTime<Utc>, zone: &str) -> Result<Zoned> {
    Ok(Zoned::new(*date, Zone::parse(zone)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_iso, DEFAULT_TIMEZONE};
    use chrono::Timelike;

    #[test]
    fn test_to_local_amsterdam() {
        let date = parse_iso("2024-03-15T12:00:00Z").unwrap();
        let local = to_local(&date, DEFAULT_TIMEZONE).unwrap();

        assert_eq!(local.zone_name(), "Europe/Amsterdam");
        assert_eq!(local.instant(), date);
        assert_eq!(local.local().hour(), 13);
        assert_eq!(local.to_string(), "2024-03-15T13:00:00.000+01:00");
    }

    #[test]
    fn test_summer_time() {
        let date = parse_iso("2024-07-01T12:00:00Z").unwrap();
        let local = to_local(&date, DEFAULT_TIMEZONE).unwrap();
        assert_eq!(local.local().hour(), 14);
    }

    #[test]
    fn test_fixed_offsets() {
        assert_eq!(Zone::parse("UTC+01:00").unwrap().name(), "UTC+01:00");
        assert_eq!(Zone::parse("UTC-05:30").unwrap().name(), "UTC-05:30");
        assert_eq!(Zone::parse("UTC+2").unwrap().name(), "UTC+02:00");
        assert_eq!(Zone::parse("utc").unwrap(), Zone::Named(Tz::UTC));
    }

    #[test]
    fn test_offset_prefix_ignores_case() {
        assert_eq!(Zone::parse("utc+01:00").unwrap().name(), "UTC+01:00");
        assert_eq!(Zone::parse("Utc-05:30").unwrap().name(), "UTC-05:30");
        assert!(Zone::parse("utc+ab").is_err());
    }

    #[test]
    fn test_unknown_zone() {
        assert!(Zone::parse("Mars/Olympus").is_err());
        assert!(Zone::parse("UTC+25:00").is_err());
        assert!(Zone::parse("UTC+ab").is_err());
    }
}
