//! Records produced by parsing, validating and aggregating daily notes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One logged activity within a day, anchored by a `### HH:MM` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Wall-clock time from the header, `HH:MM`.
    pub time: String,
    /// Name from a leading `[[Name]]` link on the header line.
    pub project: Option<String>,
    pub description: String,
    /// Value of the last `[client::...]` tag below the header.
    pub client: Option<String>,
    /// Value of the last `[hours::...]` tag below the header.
    ///
    /// `None` means "not yet recorded", which is not the same as zero.
    pub hours: Option<f64>,
    /// 1-based line of the header in the source note.
    pub line_number: usize,
    /// Header line plus every non-blank continuation line, newline-joined.
    pub raw_content: String,
}

/// Metadata block at the top of a daily note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFrontmatter {
    pub location: Option<String>,
    pub distance: Option<u32>,
    pub category: Option<String>,
    /// `HH:MM`
    pub day_start: Option<String>,
    /// `HH:MM`
    pub day_end: Option<String>,
}

impl DailyFrontmatter {
    /// Returns true when the note declares both ends of its working day.
    pub const fn has_day_bounds(&self) -> bool {
        self.day_start.is_some() && self.day_end.is_some()
    }
}

/// Severity of a single validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Error,
    Warning,
    Info,
}

impl IssueKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points an issue back at the entry that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRef {
    /// Position in the day's entry list.
    pub index: usize,
    pub time: String,
    pub line_number: usize,
}

impl EntryRef {
    pub(crate) fn new(index: usize, entry: &TimeEntry) -> Self {
        Self {
            index,
            time: entry.time.clone(),
            line_number: entry.line_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
    pub entry: Option<EntryRef>,
}

/// Overall classification of a day.
///
/// Variants are listed by display severity; the validator never compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationStatus {
    NoData,
    Complete,
    Incomplete,
    Warning,
    Error,
}

impl ValidationStatus {
    /// All statuses, in display severity order.
    pub const ALL: [Self; 5] = [
        Self::NoData,
        Self::Complete,
        Self::Incomplete,
        Self::Warning,
        Self::Error,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoData => "no-data",
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    /// In detection order.
    pub issues: Vec<ValidationIssue>,
    pub total_hours: f64,
    /// Effective expected hours, after the frontmatter day-bounds override.
    pub expected_hours: f64,
    /// `expected_hours - total_hours`; negative means surplus.
    pub missing_hours: f64,
}

impl ValidationResult {
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }
}

/// Everything known about one day, rebuilt from source on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTimeData {
    /// `YYYY-MM-DD`, as extracted from the note's file name.
    pub date: String,
    pub file_path: String,
    pub frontmatter: DailyFrontmatter,
    pub entries: Vec<TimeEntry>,
    pub total_hours: f64,
    /// Policy-derived expected hours for the date (before any frontmatter override).
    pub expected_hours: f64,
    pub validation: ValidationResult,
}

/// Summed hours over a collection of days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub total_hours: f64,
    pub expected_hours: f64,
}

impl PeriodTotals {
    pub fn from_days<'a>(days: impl IntoIterator<Item = &'a DailyTimeData>) -> Self {
        days.into_iter().fold(Self::default(), |acc, day| Self {
            total_hours: acc.total_hours + day.total_hours,
            expected_hours: acc.expected_hours + day.expected_hours,
        })
    }

    /// Expected minus logged; positive means the period is short.
    pub fn difference(&self) -> f64 {
        self.expected_hours - self.total_hours
    }
}

/// Seven consecutive days starting at `start`, holding only the days with a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekData {
    pub start: NaiveDate,
    /// ISO year of `start`.
    pub year: i32,
    /// ISO week number of `start`.
    pub week_number: u32,
    /// Sparse and ordered by date.
    pub days: Vec<DailyTimeData>,
    pub totals: PeriodTotals,
}

impl WeekData {
    pub(crate) fn new(start: NaiveDate, days: Vec<DailyTimeData>) -> Self {
        let iso = start.iso_week();
        let totals = PeriodTotals::from_days(&days);
        Self {
            start,
            year: iso.year(),
            week_number: iso.week(),
            days,
            totals,
        }
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(7)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailyTimeData> {
        let key = date.format("%Y-%m-%d").to_string();
        self.days.iter().find(|day| day.date == key)
    }

    /// The fixed seven slots of the week, each matched by date against the sparse day list.
    pub fn slots(&self) -> Vec<(NaiveDate, Option<&DailyTimeData>)> {
        self.dates().map(|date| (date, self.day(date))).collect()
    }
}

/// One calendar month, keyed by day of month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthData {
    pub year: i32,
    /// 1-based.
    pub month: u32,
    /// Every note of the day, ordered by path.
    pub days: BTreeMap<u32, Vec<DailyTimeData>>,
    pub totals: PeriodTotals,
}

impl MonthData {
    pub(crate) fn new(year: i32, month: u32, range: Vec<DailyTimeData>) -> Self {
        let totals = PeriodTotals::from_days(&range);
        let mut days: BTreeMap<u32, Vec<DailyTimeData>> = BTreeMap::new();
        for day in range {
            let Ok(date) = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d") else {
                continue;
            };
            days.entry(date.day()).or_default().push(day);
        }
        Self {
            year,
            month,
            days,
            totals,
        }
    }
}
