//! Week command: the Monday-to-Sunday week containing a date.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use treg_core::{
    Aggregator, DailyTimeData, NoteStore, PeriodTotals, ValidationStatus, WeekData,
    get_monday_of_week,
};

use super::day::JsonDay;
use super::util::{format_day_row, format_row, write_totals};

/// One of the seven fixed slots of a week.
#[derive(Debug)]
pub struct WeekRow<'a> {
    pub date: NaiveDate,
    pub working_day: bool,
    /// Policy hours for the date.
    pub expected_hours: f64,
    pub data: Option<&'a DailyTimeData>,
}

/// Pairs each date of the week with its note and policy.
pub fn week_rows<'a, S: NoteStore>(
    aggregator: &Aggregator<S>,
    week: &'a WeekData,
) -> Vec<WeekRow<'a>> {
    week.slots()
        .into_iter()
        .map(|(date, data)| WeekRow {
            date,
            working_day: aggregator.is_working_day(date),
            expected_hours: aggregator.get_expected_hours_for_date(date),
            data,
        })
        .collect()
}

/// Formats the human-readable week view.
pub fn format_week(week: &WeekData, rows: &[WeekRow<'_>]) -> String {
    let mut output = String::new();
    let end = rows.last().map_or(week.start, |row| row.date);
    writeln!(
        output,
        "Week {}, {} ({} to {})",
        week.week_number,
        week.year,
        week.start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
    .unwrap();
    writeln!(output).unwrap();

    for row in rows {
        let mut line = match row.data {
            Some(day) => format_day_row(day),
            None => format_row(
                &row.date.format("%Y-%m-%d").to_string(),
                ValidationStatus::NoData,
                0.0,
                row.expected_hours,
            ),
        };
        if !row.working_day {
            line.push_str("  (non-working day)");
        }
        writeln!(output, "{line}").unwrap();
    }

    writeln!(output).unwrap();
    write_totals(&mut output, &week.totals);
    output
}

/// JSON week report.
#[derive(Debug, Serialize)]
pub struct JsonWeek<'a> {
    pub year: i32,
    pub week_number: u32,
    pub start: String,
    pub days: Vec<JsonDay<'a>>,
    pub totals: PeriodTotals,
}

/// Formats the week as JSON.
pub fn format_week_json(week: &WeekData, rows: &[WeekRow<'_>]) -> Result<String> {
    let report = JsonWeek {
        year: week.year,
        week_number: week.week_number,
        start: week.start.format("%Y-%m-%d").to_string(),
        days: rows
            .iter()
            .map(|row| JsonDay {
                date: row.date.format("%Y-%m-%d").to_string(),
                working_day: row.working_day,
                expected_hours: row.expected_hours,
                data: row.data,
            })
            .collect(),
        totals: week.totals,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Runs the week command for the week containing `date`.
pub fn run<W: Write, S: NoteStore>(
    writer: &mut W,
    aggregator: &Aggregator<S>,
    date: NaiveDate,
    json: bool,
) -> Result<()> {
    let monday = get_monday_of_week(date);
    let week = aggregator.get_week_data(monday);
    let rows = week_rows(aggregator, &week);
    tracing::debug!(start = %monday, days = week.days.len(), "loaded week");

    if json {
        writeln!(writer, "{}", format_week_json(&week, &rows)?)?;
    } else {
        write!(writer, "{}", format_week(&week, &rows))?;
    }
    Ok(())
}
