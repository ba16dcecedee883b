//! Day, range, week and month queries over a note store.
//!
//! Nothing is cached: every query re-reads and re-validates its notes.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate};
use rayon::prelude::*;
use regex::Regex;

use crate::error::CoreError;
use crate::model::{DailyTimeData, MonthData, WeekData};
use crate::parser::{extract_date_from_filename, parse_frontmatter, parse_time_entries};
use crate::settings::{Settings, weekday_number};
use crate::store::{NoteFile, NoteStore};
use crate::validator::{total_hours, validate};

static STRICT_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a zero-padded `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    if !STRICT_DATE_RE.is_match(value) {
        return Err(CoreError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| CoreError::InvalidDate(value.to_string()))
}

/// Policy hours for a date string.
///
/// Strings that name no real calendar date (`2024-02-30`) expect nothing.
pub fn expected_hours_for_date(date: &str, working_days: &BTreeSet<u8>, per_day: f64) -> f64 {
    let working = parse_date(date)
        .ok()
        .and_then(weekday_number)
        .is_some_and(|day| working_days.contains(&day));
    if working { per_day } else { 0.0 }
}

/// Monday on or before `date`.
pub fn get_monday_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday();
    date - Days::new(u64::from(offset))
}

/// Read-only query surface over a [`NoteStore`] and a fixed [`Settings`] policy.
#[derive(Debug)]
pub struct Aggregator<S> {
    store: S,
    settings: Settings,
}

impl<S: NoteStore> Aggregator<S> {
    pub fn new(store: S, settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self { store, settings })
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.settings.is_working_day(date)
    }

    pub fn get_expected_hours_for_date(&self, date: NaiveDate) -> f64 {
        if self.is_working_day(date) {
            self.settings.expected_hours_per_day
        } else {
            0.0
        }
    }

    /// The day's note at `<folder>/<date>.md`, or `None` when absent or unreadable.
    pub fn get_daily_data(&self, date: NaiveDate) -> Option<DailyTimeData> {
        let date = date.format(DATE_FORMAT).to_string();
        let path = match self.settings.notes_folder() {
            Some(folder) => format!("{folder}/{date}.md"),
            None => format!("{date}.md"),
        };

        let Some(file) = self.store.find(&path) else {
            tracing::debug!(path = %path, "no note for day");
            return None;
        };
        self.build_daily_data(date, &file)
    }

    /// Every dated note in `[start, end]`, sorted by date.
    ///
    /// Both bounds must be `YYYY-MM-DD`. An unreadable note drops out of the
    /// result; a missing notes folder empties it.
    pub fn get_data_for_range(&self, start: &str, end: &str) -> Result<Vec<DailyTimeData>, CoreError> {
        parse_date(start)?;
        parse_date(end)?;
        if start > end {
            return Ok(Vec::new());
        }

        let folder = self.settings.notes_folder();
        let files = match self.store.list_candidate_files(folder) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(folder = ?folder, error = %e, "cannot list notes");
                return Ok(Vec::new());
            }
        };

        let mut seen = HashSet::new();
        let candidates: Vec<(String, NoteFile)> = files
            .into_iter()
            .filter(|file| seen.insert(file.path.clone()))
            .filter_map(|file| {
                let date = extract_date_from_filename(&file.name)?;
                (start <= date.as_str() && date.as_str() <= end).then_some((date, file))
            })
            .collect();
        tracing::debug!(start, end, count = candidates.len(), "range candidates");

        let mut days: Vec<DailyTimeData> = candidates
            .into_par_iter()
            .filter_map(|(date, file)| self.build_daily_data(date, &file))
            .collect();

        days.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.file_path.cmp(&b.file_path)));
        Ok(days)
    }

    /// Seven consecutive days from `start`, which is not moved to a Monday.
    pub fn get_week_data(&self, start: NaiveDate) -> WeekData {
        let days = start
            .iter_days()
            .take(7)
            .filter_map(|date| self.get_daily_data(date))
            .collect();
        WeekData::new(start, days)
    }

    /// `month` is 1-based.
    pub fn get_month_data(&self, year: i32, month: u32) -> Result<MonthData, CoreError> {
        let invalid = || CoreError::InvalidMonth { year, month };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last = first
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;

        let range = self.get_data_for_range(
            &first.format(DATE_FORMAT).to_string(),
            &last.format(DATE_FORMAT).to_string(),
        )?;
        Ok(MonthData::new(year, month, range))
    }

    fn build_daily_data(&self, date: String, file: &NoteFile) -> Option<DailyTimeData> {
        let content = match self.store.read_text(file) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = ?file.path, error = %e, "skipping unreadable note");
                return None;
            }
        };
        Some(self.evaluate_note(date, file.path.clone(), &content))
    }

    /// Parses and validates note text as the note for `date` under this policy.
    pub fn evaluate_note(&self, date: String, file_path: String, content: &str) -> DailyTimeData {
        let frontmatter = parse_frontmatter(content);
        let entries = parse_time_entries(content);
        let expected_hours = expected_hours_for_date(
            &date,
            &self.settings.working_days,
            self.settings.expected_hours_per_day,
        );
        let validation = validate(
            &entries,
            &frontmatter,
            expected_hours,
            self.settings.strict_validation,
        );

        DailyTimeData {
            date,
            file_path,
            total_hours: total_hours(&entries),
            frontmatter,
            entries,
            expected_hours,
            validation,
        }
    }
}
