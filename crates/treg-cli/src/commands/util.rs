//! Shared utilities for CLI commands.

use std::fmt::Write;
use std::sync::LazyLock;

use anyhow::Context;
use chrono::NaiveDate;
use regex::Regex;
use treg_core::display::{format_difference, format_hours};
use treg_core::{DailyTimeData, PeriodTotals, ValidationStatus};

/// Pre-compiled regex for `YYYY-MM` month arguments.
static MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})$").unwrap());

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    treg_core::parse_date(s).with_context(|| format!("Invalid date: {s}. Use YYYY-MM-DD (e.g., 2024-03-07)"))
}

/// Parse an optional date argument, falling back to `today`.
pub fn date_or(s: Option<&str>, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    s.map_or(Ok(today), parse_date)
}

/// Parse a `YYYY-MM` month argument into `(year, month)`.
pub fn parse_month(s: &str) -> anyhow::Result<(i32, u32)> {
    let Some(caps) = MONTH_RE.captures(s) else {
        anyhow::bail!("Invalid month: {s}. Use YYYY-MM (e.g., 2024-03)");
    };

    let year: i32 = caps[1].parse().context("failed to parse year")?;
    let month: u32 = caps[2].parse().context("failed to parse month")?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("Invalid month: {s}. Month must be between 01 and 12");
    }
    Ok((year, month))
}

/// One aligned summary line: weekday, date, status and hours.
pub fn format_row(
    date: &str,
    status: ValidationStatus,
    total_hours: f64,
    expected_hours: f64,
) -> String {
    let weekday = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_or_else(|_| "???".to_string(), |d| d.format("%a").to_string());
    format!(
        "{weekday} {date}  {} {:<10} {:>7} / {:>7}",
        status.icon(),
        status.label(),
        format_hours(total_hours),
        format_hours(expected_hours),
    )
}

/// Summary line for a day with a note, against its policy hours.
pub fn format_day_row(day: &DailyTimeData) -> String {
    format_row(
        &day.date,
        day.validation.status,
        day.total_hours,
        day.expected_hours,
    )
}

pub fn write_totals(output: &mut String, totals: &PeriodTotals) {
    writeln!(
        output,
        "Total: {} of {} expected ({})",
        format_hours(totals.total_hours),
        format_hours(totals.expected_hours),
        format_difference(totals.difference()),
    )
    .unwrap();
}
