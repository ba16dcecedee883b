//! Month command: every registered day of a calendar month.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use treg_core::{Aggregator, MonthData, NoteStore};

use super::util::{format_day_row, write_totals};

/// Formats the human-readable month view.
pub fn format_month(month: &MonthData) -> String {
    let mut output = String::new();
    let title = NaiveDate::from_ymd_opt(month.year, month.month, 1).map_or_else(
        || format!("{}-{:02}", month.year, month.month),
        |first| first.format("%B %Y").to_string(),
    );
    writeln!(output, "{title}").unwrap();
    writeln!(output).unwrap();

    if month.days.is_empty() {
        writeln!(output, "No notes found for this month.").unwrap();
        return output;
    }

    for day in month.days.values().flatten() {
        writeln!(output, "{}", format_day_row(day)).unwrap();
    }

    let working = month
        .days
        .values()
        .filter(|notes| notes.iter().any(|d| d.expected_hours > 0.0))
        .count();
    writeln!(output).unwrap();
    writeln!(
        output,
        "{} days with notes, {working} on working days",
        month.days.len()
    )
    .unwrap();
    write_totals(&mut output, &month.totals);
    output
}

/// Runs the month command.
pub fn run<W: Write, S: NoteStore>(
    writer: &mut W,
    aggregator: &Aggregator<S>,
    year: i32,
    month: u32,
    json: bool,
) -> Result<()> {
    let data = aggregator.get_month_data(year, month)?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&data)?)?;
    } else {
        write!(writer, "{}", format_month(&data))?;
    }
    Ok(())
}
