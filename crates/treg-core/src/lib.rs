//! Core domain logic for time registration in daily notes.
//!
//! This crate contains:
//! - Parsing: frontmatter and `### HH:MM` time entries from a note's text
//! - Validation: classifying a day against its expected hours
//! - Aggregation: day, range, week and month queries over a [`NoteStore`]

mod aggregate;
pub mod display;
mod error;
pub mod model;
pub mod parser;
pub mod settings;
pub mod store;
pub mod validator;

pub use aggregate::{Aggregator, expected_hours_for_date, get_monday_of_week, parse_date};
pub use error::CoreError;
pub use model::{
    DailyFrontmatter, DailyTimeData, EntryRef, IssueKind, MonthData, PeriodTotals, TimeEntry,
    ValidationIssue, ValidationResult, ValidationStatus, WeekData,
};
pub use parser::{
    calculate_hours_difference, extract_date_from_filename, parse_frontmatter, parse_time_entries,
};
pub use settings::Settings;
pub use store::{FsNoteStore, MemoryNoteStore, NoteFile, NoteStore, StoreError};
pub use validator::validate;
