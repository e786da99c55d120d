//! date and duration commands

use super::CommandContext;
use anyhow::{Context, Result};
use colored::Colorize;
use kitbag_dates::{
    format_duration, from_ms, get_date_hour_minutes, get_iso, get_ms, get_now, get_relative,
    get_unix, get_year_month_day, parse_iso, to_local, DisplayOptions,
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DateOutput {
    iso: String,
    unix: i64,
    ms: i64,
    year_month_day: String,
    local: String,
    zone: String,
    human: String,
    relative: String,
}

pub fn execute(
    ctx: &CommandContext,
    iso: Option<&str>,
    ms: Option<i64>,
    locale: &str,
    zone: &str,
    hour24: bool,
) -> Result<()> {
    let date = match (iso, ms) {
        (Some(iso), _) => parse_iso(iso)?,
        (None, Some(ms)) => from_ms(ms).with_context(|| format!("Timestamp out of range: {}", ms))?,
        (None, None) => get_now(),
    };

    let options = DisplayOptions::default()
        .locale(locale)
        .zone(zone)
        .prefer_24h(hour24);
    let local = to_local(&date, zone)?;

    let output = DateOutput {
        iso: get_iso(Some(&date)),
        unix: get_unix(Some(&date)),
        ms: get_ms(Some(&date)),
        year_month_day: get_year_month_day(Some(&date), true).to_string(),
        local: local.to_string(),
        zone: local.zone_name(),
        human: get_date_hour_minutes(&date, &options)?,
        relative: get_relative(&date, &options)?,
    };

    if ctx.is_json() {
        return ctx.print_json(&output);
    }

    let rows = [
        ("ISO", &output.iso),
        ("Local", &output.local),
        ("Zone", &output.zone),
        ("Human", &output.human),
        ("Relative", &output.relative),
        ("Date", &output.year_month_day),
    ];
    for (label, value) in rows {
        println!("  {}: {}", format!("{:<8}", label).cyan(), value);
    }
    println!("  {}: {}", format!("{:<8}", "Unix").cyan(), output.unix);
    println!("  {}: {}", format!("{:<8}", "Ms").cyan(), output.ms);

    Ok(())
}

pub fn duration(ctx: &CommandContext, ms: u64) -> Result<()> {
    let formatted = format_duration(ms);

    if ctx.is_json() {
        return ctx.print_json(&serde_json::json!({ "ms": ms, "formatted": formatted }));
    }

    // zero formats as an empty string
    if formatted.is_empty() {
        println!("0ms");
    } else {
        println!("{}", formatted);
    }
    Ok(())
}
