//! Human-readable dates and relative phrases

use crate::instant::get_now;
use crate::locale::{Locale, Unit};
use crate::zone::Zone;
use crate::{Result, DEFAULT_LOCALE, DEFAULT_TIMEZONE};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Utc};

// The meridiem is appended separately; most locale tables have no AM/PM strings.
const DATE_HOUR_MINUTES_12H: &str = "%a, %-d. %B %Y - %-I:%M";
const DATE_HOUR_MINUTES_24H: &str = "%a, %-d. %B %Y - %H:%M";

/// Locale, zone and clock style for display functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// BCP 47 tag, default `en`
    pub locale: String,
    /// IANA name or `UTC±HH:MM`, default `Europe/Amsterdam`
    pub zone: String,
    /// 24-hour clock instead of AM/PM, default `false`
    pub prefer_24h: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            zone: DEFAULT_TIMEZONE.to_string(),
            prefer_24h: false,
        }
    }
}

impl DisplayOptions {
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = zone.into();
        self
    }

    pub fn prefer_24h(mut self, prefer_24h: bool) -> Self {
        self.prefer_24h = prefer_24h;
        self
    }
}

/// Relative phrase for `date` as seen from now, e.g. `1 day ago`.
pub fn get_relative(date: &DateTime<Utc>, options: &DisplayOptions) -> Result<String> {
    relative_to(date, &get_now(), options)
}

/// Relative phrase for `date` as seen from `base`. Uses the largest unit
/// with a non-zero whole count, truncated toward zero.
pub fn relative_to(
    date: &DateTime<Utc>,
    base: &DateTime<Utc>,
    options: &DisplayOptions,
) -> Result<String> {
    let zone = Zone::parse(&options.zone)?;
    let start = zone.project(base);
    let end = zone.project(date);

    let (count, unit) = largest_unit(&start, &end);
    Ok(Locale::from_tag(&options.locale).relative_phrase(count, unit, end < start))
}

fn largest_unit(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> (i64, Unit) {
    let months = whole_months(start, end);
    if months.abs() >= 12 {
        return (months / 12, Unit::Year);
    }
    if months != 0 {
        return (months, Unit::Month);
    }

    let days = whole_days(start, end);
    if days != 0 {
        return (days, Unit::Day);
    }

    let elapsed = end.signed_duration_since(*start);
    let steps = [
        (elapsed.num_hours(), Unit::Hour),
        (elapsed.num_minutes(), Unit::Minute),
        (elapsed.num_seconds(), Unit::Second),
    ];

    steps
        .into_iter()
        .find(|(count, _)| *count != 0)
        .unwrap_or((0, Unit::Second))
}

// Wall-clock times in order, with the sign of `end - start`.
fn ordered(
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
) -> (NaiveDateTime, NaiveDateTime, i64) {
    if end >= start {
        (start.naive_local(), end.naive_local(), 1)
    } else {
        (end.naive_local(), start.naive_local(), -1)
    }
}

// Calendar months between two wall-clock times, truncated toward zero.
fn whole_months(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> i64 {
    let (from, to, sign) = ordered(start, end);

    let mut months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());
    if months > 0 && (to.day(), to.time()) < (from.day(), from.time()) {
        months -= 1;
    }

    sign * months
}

// Calendar days between two wall-clock times. A DST shift between them does
// not change the count.
fn whole_days(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> i64 {
    let (from, to, sign) = ordered(start, end);

    let mut days = to.date().signed_duration_since(from.date()).num_days();
    if days > 0 && to.time() < from.time() {
        days -= 1;
    }

    sign * days
}

/// `Fri, 15. March 2024 - 1:00PM`, or `... - 13:00` with a 24-hour clock.
pub fn get_date_hour_minutes(date: &DateTime<Utc>, options: &DisplayOptions) -> Result<String> {
    let local = Zone::parse(&options.zone)?.project(date);
    let pattern = if options.prefer_24h {
        DATE_HOUR_MINUTES_24H
    } else {
        DATE_HOUR_MINUTES_12H
    };

    let locale = Locale::from_tag(&options.locale).chrono_locale();
    let mut formatted = local.format_localized(pattern, locale).to_string();
    if !options.prefer_24h {
        formatted.push_str(&local.format("%p").to_string());
    }
    Ok(formatted)
}

/// `<human date> (<relative phrase>)`
pub fn get_full_relative_time(date: &DateTime<Utc>, options: &DisplayOptions) -> Result<String> {
    Ok(format!(
        "{} ({})",
        get_date_hour_minutes(date, options)?,
        get_relative(date, options)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instant::parse_iso;
    use chrono::TimeDelta;

    fn at(iso: &str) -> DateTime<Utc> {
        parse_iso(iso).unwrap()
    }

    #[test]
    fn test_relative_yesterday() {
        let yesterday = get_now() - TimeDelta::days(1);
        assert_eq!(
            get_relative(&yesterday, &DisplayOptions::default().zone("UTC")).unwrap(),
            "1 day ago"
        );
    }

    #[test]
    fn test_relative_units() {
        let base = at("2024-03-15T12:00:00Z");
        let opts = DisplayOptions::default();

        let cases = [
            ("2023-03-15T12:00:00Z", "1 year ago"),
            ("2022-01-01T00:00:00Z", "2 years ago"),
            ("2024-01-10T12:00:00Z", "2 months ago"),
            ("2024-03-13T11:00:00Z", "2 days ago"),
            ("2024-03-15T09:30:00Z", "2 hours ago"),
            ("2024-03-15T11:59:00Z", "1 minute ago"),
            ("2024-03-15T11:59:30Z", "30 seconds ago"),
            ("2024-03-15T12:00:00Z", "in 0 seconds"),
            ("2024-03-17T12:00:00Z", "in 2 days"),
            ("2024-05-15T12:00:00Z", "in 2 months"),
        ];

        for (date, expected) in cases {
            assert_eq!(relative_to(&at(date), &base, &opts).unwrap(), expected, "{date}");
        }
    }

    #[test]
    fn test_month_boundary_is_not_a_month() {
        let base = at("2024-03-01T10:00:00Z");
        let opts = DisplayOptions::default().zone("UTC");
        assert_eq!(
            relative_to(&at("2024-02-29T10:00:00Z"), &base, &opts).unwrap(),
            "1 day ago"
        );
    }

    #[test]
    fn test_days_follow_the_wall_clock_across_dst() {
        let opts = DisplayOptions::default();

        // noon to noon, spring forward in between
        let base = at("2024-03-31T10:00:00Z");
        assert_eq!(
            relative_to(&at("2024-03-30T11:00:00Z"), &base, &opts).unwrap(),
            "1 day ago"
        );
        assert_eq!(
            relative_to(&base, &at("2024-03-30T11:00:00Z"), &opts).unwrap(),
            "in 1 day"
        );

        // noon to noon, fall back in between
        let base = at("2024-10-27T11:00:00Z");
        assert_eq!(
            relative_to(&at("2024-10-26T10:00:00Z"), &base, &opts).unwrap(),
            "1 day ago"
        );

        // 12:00 to 11:30 the next day is short of a calendar day
        assert_eq!(
            relative_to(&at("2024-10-26T10:00:00Z"), &at("2024-10-27T10:30:00Z"), &opts)
                .unwrap(),
            "24 hours ago"
        );
    }

    #[test]
    fn test_relative_locales() {
        let base = at("2024-03-15T12:00:00Z");
        let date = at("2024-03-01T12:00:00Z");
        let phrase = |locale: &str| {
            relative_to(&date, &base, &DisplayOptions::default().locale(locale)).unwrap()
        };

        assert_eq!(phrase("en"), "14 days ago");
        assert_eq!(phrase("nl"), "14 dagen geleden");
        assert_eq!(phrase("fr"), "il y a 14 jours");
        assert_eq!(phrase("de"), "vor 14 Tagen");
    }

    #[test]
    fn test_date_hour_minutes() {
        let formatted =
            get_date_hour_minutes(&at("2024-03-15T12:00:00Z"), &DisplayOptions::default())
                .unwrap();
        assert_eq!(formatted, "Fri, 15. March 2024 - 1:00PM");
    }

    #[test]
    fn test_date_hour_minutes_12h_marker_in_every_locale() {
        let afternoon = at("2024-03-15T14:00:00Z");
        let night = at("2024-03-15T01:00:00Z");

        for (locale, month) in [("en", "March"), ("nl", "maart"), ("fr", "mars"), ("de", "März")] {
            let opts = DisplayOptions::default().locale(locale).zone("UTC");

            let pm = get_date_hour_minutes(&afternoon, &opts).unwrap();
            assert!(pm.contains(month), "{pm}");
            assert!(pm.ends_with(" - 2:00PM"), "{pm}");

            let am = get_date_hour_minutes(&night, &opts).unwrap();
            assert!(am.ends_with(" - 1:00AM"), "{am}");
        }
    }

    #[test]
    fn test_date_hour_minutes_24h() {
        let opts = DisplayOptions::default().zone("UTC").prefer_24h(true);
        let formatted = get_date_hour_minutes(&at("2024-03-15T14:00:00Z"), &opts).unwrap();
        assert!(formatted.contains("Mar"));
        assert!(formatted.contains("2024"));
        assert!(formatted.contains("14:00"));
    }

    #[test]
    fn test_date_hour_minutes_fixed_offset() {
        let opts = DisplayOptions::default().zone("UTC+01:00").prefer_24h(true);
        let formatted = get_date_hour_minutes(&at("2024-03-15T14:00:00Z"), &opts).unwrap();
        assert!(formatted.contains("15:00"));
    }

    #[test]
    fn test_full_relative_time() {
        let full =
            get_full_relative_time(&at("2024-03-15T12:00:00Z"), &DisplayOptions::default())
                .unwrap();
        assert!(full.contains("Mar"));
        assert!(full.contains("2024"));
        assert!(full.ends_with("ago)"));
    }

    #[test]
    fn test_full_relative_time_locales() {
        let date = at("2024-03-01T12:00:00Z");
        let full = |opts: DisplayOptions| get_full_relative_time(&date, &opts).unwrap();

        let nl = full(DisplayOptions::default().locale("nl"));
        assert!(nl.contains("maart") && nl.contains("2024") && nl.contains("geleden"));

        let fr = full(DisplayOptions::default().locale("fr"));
        assert!(fr.contains("mars") && fr.contains("2024") && fr.contains("il y a"));

        let de = full(DisplayOptions::default().locale("de"));
        assert!(de.contains("März") && de.contains("2024") && de.contains("vor"));
    }

    #[test]
    fn test_full_relative_time_zone_and_clock() {
        let date = at("2024-03-01T12:00:00Z");

        let en = get_full_relative_time(&date, &DisplayOptions::default().zone("UTC+01:00"))
            .unwrap();
        assert!(en.contains(" 1:00"));
        assert!(en.contains("ago"));

        let de = get_full_relative_time(
            &date,
            &DisplayOptions::default()
                .locale("de")
                .zone("UTC+01:00")
                .prefer_24h(true),
        )
        .unwrap();
        assert!(de.contains("März"));
        assert!(de.contains("13:00"));
        assert!(de.contains("vor"));
    }

    #[test]
    fn test_unknown_zone_is_an_error() {
        let opts = DisplayOptions::default().zone("Nowhere/Special");
        assert!(get_date_hour_minutes(&get_now(), &opts).is_err());
    }
}
