//! Range command: every dated note between two dates.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use treg_core::{Aggregator, DailyTimeData, NoteStore, PeriodTotals};

use super::util::{format_day_row, write_totals};

/// Formats the human-readable range listing.
pub fn format_range(start: &str, end: &str, days: &[DailyTimeData]) -> String {
    let mut output = String::new();
    writeln!(output, "{start} to {end}").unwrap();
    writeln!(output).unwrap();

    if days.is_empty() {
        writeln!(output, "No notes found in this range.").unwrap();
        return output;
    }

    for day in days {
        let row = format_day_row(day);
        writeln!(output, "{row}  {}", day.file_path).unwrap();
    }

    writeln!(output).unwrap();
    write_totals(&mut output, &PeriodTotals::from_days(days));
    output
}

/// Runs the range command.
pub fn run<W: Write, S: NoteStore>(
    writer: &mut W,
    aggregator: &Aggregator<S>,
    start: &str,
    end: &str,
    json: bool,
) -> Result<()> {
    let days = aggregator
        .get_data_for_range(start, end)
        .context("failed to query range")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&days)?)?;
    } else {
        write!(writer, "{}", format_range(start, end, &days))?;
    }
    Ok(())
}
