//! Status command: a one-line summary suited to a status bar.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use treg_core::{Aggregator, DailyTimeData, NoteStore};

pub fn format_status(data: Option<&DailyTimeData>) -> String {
    match data {
        Some(day) => format!("{} {:.2}h", day.validation.status.icon(), day.total_hours),
        None => "⏱ 0h".to_string(),
    }
}

pub fn run<W: Write, S: NoteStore>(
    writer: &mut W,
    aggregator: &Aggregator<S>,
    date: NaiveDate,
) -> Result<()> {
    let data = aggregator.get_daily_data(date);
    writeln!(writer, "{}", format_status(data.as_ref()))?;
    Ok(())
}
