//! Errors for caller contract violations.
//!
//! Messy note content never produces one of these; it surfaces as
//! [`ValidationIssue`](crate::ValidationIssue)s instead.

use thiserror::Error;

/// Invalid input handed to the core by the calling layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A date argument was not a zero-padded `YYYY-MM-DD` calendar date.
    #[error("invalid date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// A month argument outside 1-12, or a year chrono cannot represent.
    #[error("invalid month: {year}-{month} (month must be 1-12)")]
    InvalidMonth { year: i32, month: u32 },

    /// The settings object violates its own constraints.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}
