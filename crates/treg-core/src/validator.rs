//! Classifying a day's entries against the hours it was expected to log.

use crate::model::{
    DailyFrontmatter, EntryRef, IssueKind, TimeEntry, ValidationIssue, ValidationResult,
    ValidationStatus,
};
use crate::parser::calculate_hours_difference;

/// Shortfalls at or below this many hours count as rounding noise.
pub const INCOMPLETE_TOLERANCE_HOURS: f64 = 0.1;

/// Sum of the recorded hours; entries without hours contribute nothing.
pub fn total_hours(entries: &[TimeEntry]) -> f64 {
    entries
        .iter()
        .filter_map(|entry| entry.hours)
        .fold(0.0, |sum, hours| sum + hours)
}

/// Expected hours after the frontmatter override.
///
/// When the note declares both `day-start` and `day-end`, their difference
/// replaces the policy figure.
pub fn effective_expected_hours(frontmatter: &DailyFrontmatter, policy_hours: f64) -> f64 {
    match (&frontmatter.day_start, &frontmatter.day_end) {
        (Some(start), Some(end)) => calculate_hours_difference(start, end),
        _ => policy_hours,
    }
}

fn issue(kind: IssueKind, message: String, entry: Option<EntryRef>) -> ValidationIssue {
    ValidationIssue {
        kind,
        message,
        entry,
    }
}

fn check_entry(index: usize, entry: &TimeEntry, strict: bool, issues: &mut Vec<ValidationIssue>) {
    let at = &entry.time;
    let entry_ref = || Some(EntryRef::new(index, entry));

    if entry.client.is_none() {
        issues.push(issue(
            IssueKind::Error,
            format!("Missing client for entry at {at}"),
            entry_ref(),
        ));
    }

    if entry.hours.is_none() {
        issues.push(issue(
            IssueKind::Error,
            format!("Missing hours for entry at {at}"),
            entry_ref(),
        ));
    }

    if !strict {
        return;
    }

    if entry.project.is_none() {
        issues.push(issue(
            IssueKind::Warning,
            format!("No project linked for entry at {at}"),
            entry_ref(),
        ));
    }

    if entry.description.trim().is_empty() {
        issues.push(issue(
            IssueKind::Warning,
            format!("No description for entry at {at}"),
            entry_ref(),
        ));
    }
}

/// Validate one day's entries.
///
/// `policy_hours` is the working-days figure for the date; `strict` adds
/// warnings for stylistic omissions. Excess hours are never reported.
pub fn validate(
    entries: &[TimeEntry],
    frontmatter: &DailyFrontmatter,
    policy_hours: f64,
    strict: bool,
) -> ValidationResult {
    let total_hours = total_hours(entries);
    let expected_hours = effective_expected_hours(frontmatter, policy_hours);

    if entries.is_empty() {
        return ValidationResult {
            status: ValidationStatus::NoData,
            issues: vec![issue(
                IssueKind::Info,
                "No time entries found".to_string(),
                None,
            )],
            total_hours: 0.0,
            expected_hours,
            missing_hours: expected_hours,
        };
    }

    let mut issues = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        check_entry(index, entry, strict, &mut issues);
    }

    let missing_hours = expected_hours - total_hours;
    let hours_incomplete = missing_hours > INCOMPLETE_TOLERANCE_HOURS;
    if hours_incomplete {
        issues.push(issue(
            IssueKind::Info,
            format!(
                "Missing {missing_hours:.2} hours (expected {expected_hours}h, got {total_hours}h)"
            ),
            None,
        ));
    }

    if strict && !frontmatter.has_day_bounds() {
        issues.push(issue(
            IssueKind::Warning,
            "Missing day-start or day-end in frontmatter".to_string(),
            None,
        ));
    }

    let has = |kind: IssueKind| issues.iter().any(|i| i.kind == kind);
    let status = if has(IssueKind::Error) {
        ValidationStatus::Error
    } else if hours_incomplete {
        ValidationStatus::Incomplete
    } else if has(IssueKind::Warning) {
        ValidationStatus::Warning
    } else {
        ValidationStatus::Complete
    };

    ValidationResult {
        status,
        issues,
        total_hours,
        expected_hours,
        missing_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(time: &str) -> TimeEntry {
        TimeEntry {
            time: time.to_string(),
            project: Some("ProjectX".to_string()),
            description: "Work".to_string(),
            client: Some("Acme".to_string()),
            hours: Some(1.0),
            line_number: 1,
            raw_content: format!("### {time} [[ProjectX]] Work"),
        }
    }

    fn with_hours(time: &str, hours: f64) -> TimeEntry {
        TimeEntry {
            hours: Some(hours),
            ..entry(time)
        }
    }

    fn bounded(start: &str, end: &str) -> DailyFrontmatter {
        DailyFrontmatter {
            day_start: Some(start.to_string()),
            day_end: Some(end.to_string()),
            ..DailyFrontmatter::default()
        }
    }

    fn messages(result: &ValidationResult) -> Vec<&str> {
        result.issues.iter().map(|i| i.message.as_str()).collect()
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact arithmetic on representable values")]
    fn empty_day_is_no_data_regardless_of_mode() {
        for strict in [false, true] {
            for fm in [DailyFrontmatter::default(), bounded("09:00", "13:00")] {
                let result = validate(&[], &fm, 8.0, strict);
                assert_eq!(result.status, ValidationStatus::NoData);
                assert_eq!(result.issues.len(), 1);
                assert_eq!(result.issues[0].kind, IssueKind::Info);
                assert_eq!(result.issues[0].message, "No time entries found");
                assert_eq!(result.total_hours, 0.0);
                assert_eq!(result.missing_hours, result.expected_hours);
            }
        }
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact arithmetic on representable values")]
    fn complete_day() {
        let entries = [with_hours("09:00", 4.0), with_hours("13:00", 4.0)];
        let result = validate(&entries, &DailyFrontmatter::default(), 8.0, false);
        assert_eq!(result.status, ValidationStatus::Complete);
        assert!(result.issues.is_empty());
        assert_eq!(result.total_hours, 8.0);
        assert_eq!(result.missing_hours, 0.0);
    }

    #[test]
    fn missing_client_and_hours_are_errors_referencing_the_entry() {
        let mut bare = entry("10:15");
        bare.client = None;
        bare.hours = None;
        let entries = [entry("09:00"), bare];

        for strict in [false, true] {
            let result = validate(&entries, &bounded("09:00", "10:00"), 8.0, strict);
            let errors: Vec<_> = result.issues_of(IssueKind::Error).collect();
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[0].message, "Missing client for entry at 10:15");
            assert_eq!(errors[1].message, "Missing hours for entry at 10:15");
            for error in errors {
                let entry_ref = error.entry.as_ref().unwrap();
                assert_eq!(entry_ref.index, 1);
                assert_eq!(entry_ref.time, "10:15");
            }
            assert_eq!(result.status, ValidationStatus::Error);
        }
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact arithmetic on representable values")]
    fn missing_hours_count_as_zero_in_total() {
        let mut unrecorded = entry("11:00");
        unrecorded.hours = None;
        let entries = [with_hours("09:00", 2.5), unrecorded, with_hours("14:00", 0.25)];
        let result = validate(&entries, &DailyFrontmatter::default(), 8.0, false);
        assert_eq!(result.total_hours, 2.75);
        assert_eq!(result.missing_hours, 8.0 - 2.75);
    }

    #[test]
    fn error_dominates_shortfall() {
        let mut no_client = with_hours("09:00", 1.0);
        no_client.client = None;
        let result = validate(&[no_client], &DailyFrontmatter::default(), 8.0, false);
        assert_eq!(result.status, ValidationStatus::Error);
        assert_eq!(
            messages(&result),
            [
                "Missing client for entry at 09:00",
                "Missing 7.00 hours (expected 8h, got 1h)",
            ]
        );
    }

    #[test]
    fn shortfall_beats_strict_warnings() {
        let mut unlinked = with_hours("09:00", 6.5);
        unlinked.project = None;
        let result = validate(&[unlinked], &DailyFrontmatter::default(), 8.0, true);
        assert_eq!(result.status, ValidationStatus::Incomplete);
        assert_eq!(
            messages(&result),
            [
                "No project linked for entry at 09:00",
                "Missing 1.50 hours (expected 8h, got 6.5h)",
                "Missing day-start or day-end in frontmatter",
            ]
        );
    }

    #[test]
    fn strict_warnings_without_shortfall() {
        let mut blank = with_hours("09:00", 8.0);
        blank.description = "   ".to_string();
        let result = validate(&[blank], &bounded("09:00", "17:00"), 0.0, true);
        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(messages(&result), ["No description for entry at 09:00"]);
    }

    #[test]
    fn lenient_mode_never_warns() {
        let mut sloppy = with_hours("09:00", 8.0);
        sloppy.project = None;
        sloppy.description = String::new();
        let result = validate(&[sloppy], &DailyFrontmatter::default(), 8.0, false);
        assert_eq!(result.issues_of(IssueKind::Warning).count(), 0);
        assert_eq!(result.status, ValidationStatus::Complete);
    }

    #[test]
    fn issue_order_is_entry_then_shortfall_then_frontmatter() {
        let mut first = entry("09:00");
        first.client = None;
        first.hours = None;
        first.project = None;
        first.description = String::new();
        let mut second = entry("10:00");
        second.client = None;
        let result = validate(&[first, second], &DailyFrontmatter::default(), 8.0, true);
        assert_eq!(
            messages(&result),
            [
                "Missing client for entry at 09:00",
                "Missing hours for entry at 09:00",
                "No project linked for entry at 09:00",
                "No description for entry at 09:00",
                "Missing client for entry at 10:00",
                "Missing 7.00 hours (expected 8h, got 1h)",
                "Missing day-start or day-end in frontmatter",
            ]
        );
    }

    #[test]
    fn tolerance_boundary_is_exclusive() {
        let entries = [with_hours("09:00", 0.0)];

        let at_boundary = validate(&entries, &DailyFrontmatter::default(), 0.1, false);
        assert_eq!(at_boundary.status, ValidationStatus::Complete);
        assert!(at_boundary.issues.is_empty());

        let past_boundary = validate(&entries, &DailyFrontmatter::default(), 0.100_000_1, false);
        assert_eq!(past_boundary.status, ValidationStatus::Incomplete);
        assert_eq!(past_boundary.issues.len(), 1);
    }

    #[test]
    fn surplus_is_never_an_issue() {
        let entries = [with_hours("09:00", 12.0)];
        let result = validate(&entries, &DailyFrontmatter::default(), 8.0, false);
        assert_eq!(result.status, ValidationStatus::Complete);
        assert!(result.issues.is_empty());
        assert!(result.missing_hours < 0.0);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact arithmetic on representable values")]
    fn frontmatter_bounds_override_policy() {
        let entries = [with_hours("09:00", 4.0)];
        let result = validate(&entries, &bounded("09:00", "13:00"), 8.0, false);
        assert_eq!(result.expected_hours, 4.0);
        assert_eq!(result.status, ValidationStatus::Complete);

        let half_bounded = DailyFrontmatter {
            day_start: Some("09:00".to_string()),
            ..DailyFrontmatter::default()
        };
        let result = validate(&entries, &half_bounded, 8.0, false);
        assert_eq!(result.expected_hours, 8.0);
        assert_eq!(result.status, ValidationStatus::Incomplete);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact arithmetic on representable values")]
    fn inverted_bounds_yield_negative_expectation() {
        let entries = [with_hours("09:00", 1.0)];
        let result = validate(&entries, &bounded("17:00", "09:00"), 8.0, false);
        assert_eq!(result.expected_hours, -8.0);
        assert_eq!(result.missing_hours, -9.0);
        assert_eq!(result.status, ValidationStatus::Complete);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "missing hours is computed without rounding")]
    fn missing_hours_is_exact_difference() {
        let entries = [with_hours("09:00", 0.1), with_hours("10:00", 0.2)];
        let result = validate(&entries, &DailyFrontmatter::default(), 1.0, false);
        assert_eq!(result.total_hours, 0.1 + 0.2);
        assert_eq!(result.missing_hours, 1.0 - (0.1 + 0.2));
        assert_eq!(
            result.issues[0].message,
            "Missing 0.70 hours (expected 1h, got 0.30000000000000004h)"
        );
    }
}
