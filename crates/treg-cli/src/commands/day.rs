//! Day command: one day's registrations, totals and issues.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use treg_core::display::{format_clock, format_difference, format_hours};
use treg_core::{Aggregator, DailyTimeData, NoteStore};

/// JSON shape of a day, present whether or not the day has a note.
#[derive(Debug, Serialize)]
pub struct JsonDay<'a> {
    pub date: String,
    pub working_day: bool,
    /// Policy hours for the date.
    pub expected_hours: f64,
    pub data: Option<&'a DailyTimeData>,
}

fn write_frontmatter(output: &mut String, day: &DailyTimeData) {
    let fm = &day.frontmatter;
    let mut lines = Vec::new();
    if let (Some(start), Some(end)) = (&fm.day_start, &fm.day_end) {
        lines.push(format!("Day:      {start} - {end}"));
    }
    if let Some(location) = &fm.location {
        lines.push(format!("Location: {location}"));
    }
    if let Some(distance) = fm.distance {
        lines.push(format!("Distance: {distance} km"));
    }
    if let Some(category) = &fm.category {
        lines.push(format!("Category: {category}"));
    }

    if lines.is_empty() {
        return;
    }
    writeln!(output).unwrap();
    for line in lines {
        writeln!(output, "{line}").unwrap();
    }
}

fn write_issues(output: &mut String, day: &DailyTimeData) {
    let issues = &day.validation.issues;
    if issues.is_empty() {
        return;
    }
    writeln!(output).unwrap();
    writeln!(output, "Issues").unwrap();
    writeln!(output, "──────").unwrap();
    for issue in issues {
        writeln!(output, "{} {}", issue.kind.icon(), issue.message).unwrap();
    }
}

fn write_entries(output: &mut String, day: &DailyTimeData) {
    writeln!(output).unwrap();
    writeln!(output, "Time Entries").unwrap();
    writeln!(output, "────────────").unwrap();

    if day.entries.is_empty() {
        writeln!(output, "No time entries found").unwrap();
        return;
    }

    for entry in &day.entries {
        let project = entry.project.as_deref().unwrap_or("-");
        let client = entry.client.as_deref().unwrap_or("-");
        let hours = entry
            .hours
            .map_or_else(|| "-".to_string(), |hours| format!("{hours}h"));
        let line = format!(
            "{}  {project:<16} {client:<12} {hours:>6}  {}",
            entry.time, entry.description
        );
        writeln!(output, "{}", line.trim_end()).unwrap();
    }
}

/// Formats the human-readable day view.
pub fn format_day(date: NaiveDate, expected_hours: f64, data: Option<&DailyTimeData>) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "Time Registration - {} ({})",
        date.format("%Y-%m-%d"),
        date.format("%A")
    )
    .unwrap();

    let Some(day) = data else {
        writeln!(output).unwrap();
        writeln!(output, "No note found for this day.").unwrap();
        writeln!(output, "Expected:   {}", format_hours(expected_hours)).unwrap();
        return output;
    };

    let validation = &day.validation;
    writeln!(output, "{} {}", validation.status.icon(), validation.status.label()).unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "Total:      {} ({})",
        format_hours(day.total_hours),
        format_clock(day.total_hours)
    )
    .unwrap();
    writeln!(output, "Expected:   {}", format_hours(validation.expected_hours)).unwrap();
    writeln!(output, "Difference: {}", format_difference(validation.missing_hours)).unwrap();

    write_frontmatter(&mut output, day);
    write_issues(&mut output, day);
    write_entries(&mut output, day);

    output
}

/// Formats the day as JSON.
pub fn format_day_json(
    date: NaiveDate,
    working_day: bool,
    expected_hours: f64,
    data: Option<&DailyTimeData>,
) -> Result<String> {
    let report = JsonDay {
        date: date.format("%Y-%m-%d").to_string(),
        working_day,
        expected_hours,
        data,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Runs the day command.
pub fn run<W: Write, S: NoteStore>(
    writer: &mut W,
    aggregator: &Aggregator<S>,
    date: NaiveDate,
    json: bool,
) -> Result<()> {
    let data = aggregator.get_daily_data(date);
    let expected_hours = aggregator.get_expected_hours_for_date(date);

    if json {
        let output = format_day_json(
            date,
            aggregator.is_working_day(date),
            expected_hours,
            data.as_ref(),
        )?;
        writeln!(writer, "{output}")?;
    } else {
        write!(writer, "{}", format_day(date, expected_hours, data.as_ref()))?;
    }
    Ok(())
}
