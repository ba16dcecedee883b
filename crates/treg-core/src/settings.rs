//! Read-only expected-hours policy.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Policy the aggregator applies to every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Restrict lookups to this subfolder of the note store. Empty means the root.
    pub daily_notes_folder: Option<String>,

    /// Hours expected on a working day.
    pub expected_hours_per_day: f64,

    /// Weekday numbers, 0 = Sunday through 6 = Saturday.
    pub working_days: BTreeSet<u8>,

    /// Also warn about missing project links, empty descriptions and missing day bounds.
    pub strict_validation: bool,

    /// Reserved. Excess hours are never reported, whatever this says.
    pub warn_on_excess_hours: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_notes_folder: None,
            expected_hours_per_day: 8.0,
            working_days: BTreeSet::from([1, 2, 3, 4, 5]), // Monday to Friday
            strict_validation: false,
            warn_on_excess_hours: false,
        }
    }
}

impl Settings {
    /// Rejects settings no caller should be able to hand in.
    pub fn validate(&self) -> Result<(), CoreError> {
        let hours = self.expected_hours_per_day;
        if !hours.is_finite() || hours <= 0.0 {
            return Err(CoreError::InvalidSettings(format!(
                "expected_hours_per_day must be a positive number, got {hours}"
            )));
        }

        if let Some(day) = self.working_days.iter().find(|&&day| day > 6) {
            return Err(CoreError::InvalidSettings(format!(
                "working day {day} is outside 0 (Sunday) to 6 (Saturday)"
            )));
        }

        Ok(())
    }

    /// The notes folder, with blank values and trailing slashes normalized away.
    pub fn notes_folder(&self) -> Option<&str> {
        self.daily_notes_folder
            .as_deref()
            .map(|folder| folder.trim().trim_end_matches('/'))
            .filter(|folder| !folder.is_empty())
    }

    /// Whether `date` falls on a configured working weekday.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        weekday_number(date).is_some_and(|day| self.working_days.contains(&day))
    }
}

/// 0 = Sunday through 6 = Saturday.
pub fn weekday_number(date: NaiveDate) -> Option<u8> {
    u8::try_from(date.weekday().num_days_from_sunday()).ok()
}
