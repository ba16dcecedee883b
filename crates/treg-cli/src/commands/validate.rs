//! Validate command: one day's status and its first issues.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use treg_core::display::format_hours;
use treg_core::{Aggregator, DailyTimeData, NoteStore, extract_date_from_filename};

/// Issues listed before the rest are summarized as a count.
const MAX_LISTED_ISSUES: usize = 5;

/// Formats the validation summary for a day's note.
pub fn format_validation(day: &DailyTimeData) -> String {
    let mut output = String::new();
    let validation = &day.validation;
    writeln!(
        output,
        "{}: {} {}",
        day.date,
        validation.status.icon(),
        validation.status.label()
    )
    .unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "Total: {} / {}h",
        format_hours(day.total_hours),
        day.expected_hours
    )
    .unwrap();

    let issues = &validation.issues;
    if issues.is_empty() {
        return output;
    }

    writeln!(output).unwrap();
    writeln!(output, "Issues ({}):", issues.len()).unwrap();
    for issue in issues.iter().take(MAX_LISTED_ISSUES) {
        writeln!(output, "{} {}", issue.kind.icon(), issue.message).unwrap();
    }
    let remaining = issues.len().saturating_sub(MAX_LISTED_ISSUES);
    if remaining > 0 {
        writeln!(output, "... and {remaining} more").unwrap();
    }
    output
}

/// Reads a note from anywhere on disk and validates it as the note for the date in its name.
pub fn evaluate_file<S: NoteStore>(aggregator: &Aggregator<S>, path: &Path) -> Result<DailyTimeData> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some(date) = extract_date_from_filename(&stem) else {
        anyhow::bail!(
            "Cannot determine date from file name: {}. Name it after its day (e.g., 2024-03-07.md)",
            path.display()
        );
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(aggregator.evaluate_note(date, path.display().to_string(), &content))
}

/// Runs the validate command for a stored day or an explicit file.
pub fn run<W: Write, S: NoteStore>(
    writer: &mut W,
    aggregator: &Aggregator<S>,
    date: NaiveDate,
    file: Option<&Path>,
) -> Result<()> {
    let data = match file {
        Some(path) => Some(evaluate_file(aggregator, path)?),
        None => aggregator.get_daily_data(date),
    };

    match data {
        Some(day) => write!(writer, "{}", format_validation(&day))?,
        None => writeln!(writer, "{}: no note found", date.format("%Y-%m-%d"))?,
    }
    Ok(())
}
