//! Static presentation of statuses, issue kinds and hour figures.
//!
//! Every mapping here is an exhaustive match, so adding a status without an
//! icon, color and label does not compile.

use crate::model::{IssueKind, ValidationStatus};

impl ValidationStatus {
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Complete => "✓",
            Self::Incomplete => "◐",
            Self::Warning => "⚠",
            Self::Error => "✗",
            Self::NoData => "○",
        }
    }

    /// Hex color used to tint the day.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Complete => "#4caf50",
            Self::Incomplete => "#2196f3",
            Self::Warning => "#ff9800",
            Self::Error => "#f44336",
            Self::NoData => "#9e9e9e",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Complete => "Complete",
            Self::Incomplete => "Incomplete",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::NoData => "No Data",
        }
    }
}

impl IssueKind {
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Error => "❌",
            Self::Warning => "⚠️",
            Self::Info => "ℹ️",
        }
    }
}

/// `7.5` -> `"7.50h"`
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}h")
}

/// Signed view of a shortfall: a positive `missing` renders as `-1.50h`, a surplus as `+0.50h`.
pub fn format_difference(missing: f64) -> String {
    let sign = if missing > 0.0 { '-' } else { '+' };
    format!("{sign}{:.2}h", missing.abs())
}

/// Decimal hours as a clock string: `7.5` -> `"7:30"`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "rounded minute counts of realistic hour figures fit in i64"
)]
pub fn format_clock(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round() as i64;
    let sign = if total_minutes < 0 { "-" } else { "" };
    let total_minutes = total_minutes.abs();
    format!("{sign}{}:{:02}", total_minutes / 60, total_minutes % 60)
}
