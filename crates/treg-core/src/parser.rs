//! Recovering time entries and frontmatter from daily-note markdown.
//!
//! Parsing never fails. Anything that cannot be read is left unset and shows
//! up later as a validation issue.
//!
//! # Note format
//!
//! ```text
//! ---
//! location: Office
//! day-start: 09:00
//! day-end: 17:30
//! ---
//!
//! ### 09:30 [[ProjectX]] Sprint planning
//! - [client::Acme]
//! - [hours::1.5]
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{DailyFrontmatter, TimeEntry};

/// Frontmatter block anchored at the very start of the note.
static FRONTMATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---").unwrap());

/// `### HH:MM <rest>`; `<rest>` must be non-empty.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###\s+([0-9]{2}:[0-9]{2})\s+(.+)").unwrap());

/// Leading `[[Name]]` on the header rest.
static PROJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\[([^\]]+)\]\]\s*(.*)").unwrap());

static CLIENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[client::([^\]]+)\]").unwrap());

static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[hours::([0-9.]+)\]").unwrap());

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").unwrap());

// ========== Frontmatter ==========

type FieldSetter = fn(&mut DailyFrontmatter, &str);

/// Recognized frontmatter fields: name, value pattern, setter.
///
/// Each pattern runs independently over the whole block and the first match wins.
static FIELD_RULES: LazyLock<Vec<(&'static str, Regex, FieldSetter)>> = LazyLock::new(|| {
    vec![
        rule("location", "(.+)$", |fm, v| fm.location = non_empty(v)),
        rule("distance", "([0-9]+)", |fm, v| fm.distance = v.parse().ok()),
        rule("category", "(.+)$", |fm, v| fm.category = non_empty(v)),
        rule("day-start", "([0-9]{2}:[0-9]{2})", |fm, v| {
            fm.day_start = Some(v.to_string());
        }),
        rule("day-end", "([0-9]{2}:[0-9]{2})", |fm, v| {
            fm.day_end = Some(v.to_string());
        }),
    ]
});

fn rule(name: &'static str, value: &str, setter: FieldSetter) -> (&'static str, Regex, FieldSetter) {
    let pattern = format!(r"(?m)^{}:[ \t]*{value}", regex::escape(name));
    (name, Regex::new(&pattern).unwrap(), setter)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse the leading `---` block of a note.
///
/// A note without one yields an empty frontmatter, not an error.
pub fn parse_frontmatter(content: &str) -> DailyFrontmatter {
    let mut frontmatter = DailyFrontmatter::default();

    let Some(block) = FRONTMATTER_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return frontmatter;
    };

    for (name, pattern, setter) in FIELD_RULES.iter() {
        if let Some(value) = pattern.captures(block).and_then(|caps| caps.get(1)) {
            tracing::trace!(field = *name, value = value.as_str(), "frontmatter field");
            setter(&mut frontmatter, value.as_str());
        }
    }

    frontmatter
}

// ========== Time Entries ==========

/// How the scanner sees a single line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Header { time: &'a str, rest: &'a str },
    Continuation(&'a str),
    Blank,
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some(caps) = HEADER_RE.captures(line) {
            if let (Some(time), Some(rest)) = (caps.get(1), caps.get(2)) {
                return Self::Header {
                    time: time.as_str(),
                    rest: rest.as_str(),
                };
            }
        }
        if line.trim().is_empty() {
            Self::Blank
        } else {
            Self::Continuation(line)
        }
    }
}

/// An entry whose header has been seen but which may still gain tags.
#[derive(Debug, Clone, PartialEq)]
struct PartialEntry {
    time: String,
    project: Option<String>,
    description: String,
    client: Option<String>,
    hours: Option<f64>,
    line_number: usize,
    raw_content: String,
}

impl PartialEntry {
    fn from_header(line_number: usize, header: &str, time: &str, rest: &str) -> Self {
        let (project, description) = match PROJECT_RE.captures(rest) {
            Some(caps) => (
                caps.get(1).map(|m| m.as_str().to_string()),
                caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
            ),
            None => (None, rest.trim().to_string()),
        };

        Self {
            time: time.to_string(),
            project,
            description,
            client: None,
            hours: None,
            line_number,
            raw_content: header.to_string(),
        }
    }

    /// Fold a continuation line in. Later lines overwrite earlier tag values.
    fn absorb(&mut self, line: &str) {
        self.raw_content.push('\n');
        self.raw_content.push_str(line);

        if let Some(value) = CLIENT_RE.captures(line).and_then(|caps| caps.get(1)) {
            self.client = non_empty(value.as_str());
        }

        if let Some(hours) = HOURS_RE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_decimal_prefix(m.as_str()))
        {
            self.hours = Some(hours);
        }
    }

    /// Entries without a captured time are dropped.
    fn finalize(self) -> Option<TimeEntry> {
        if self.time.is_empty() {
            return None;
        }
        Some(TimeEntry {
            time: self.time,
            project: self.project,
            description: self.description,
            client: self.client,
            hours: self.hours,
            line_number: self.line_number,
            raw_content: self.raw_content,
        })
    }
}

/// Scanner state between lines.
#[derive(Debug, Clone, PartialEq)]
enum ScanState {
    NoOpenEntry,
    OpenEntry(PartialEntry),
}

impl ScanState {
    fn step(self, line_number: usize, text: &str, entries: &mut Vec<TimeEntry>) -> Self {
        match (self, Line::classify(text)) {
            (state, Line::Header { time, rest }) => {
                state.finish(entries);
                Self::OpenEntry(PartialEntry::from_header(line_number, text, time, rest))
            }
            (Self::OpenEntry(mut partial), Line::Continuation(line)) => {
                partial.absorb(line);
                Self::OpenEntry(partial)
            }
            // Blank lines, and anything before the first header.
            (state, _) => state,
        }
    }

    fn finish(self, entries: &mut Vec<TimeEntry>) {
        if let Self::OpenEntry(partial) = self {
            entries.extend(partial.finalize());
        }
    }
}

/// Extract time entries in document order.
pub fn parse_time_entries(content: &str) -> Vec<TimeEntry> {
    let mut entries = Vec::new();
    let mut state = ScanState::NoOpenEntry;

    for (index, line) in content.lines().enumerate() {
        state = state.step(index + 1, line, &mut entries);
    }
    state.finish(&mut entries);

    entries
}

/// Longest leading decimal of a digits-and-dots capture (`1.5.2` reads as `1.5`).
fn parse_decimal_prefix(raw: &str) -> Option<f64> {
    let end = raw
        .match_indices('.')
        .nth(1)
        .map_or(raw.len(), |(index, _)| index);
    raw[..end].parse().ok()
}

// ========== Time Arithmetic ==========

fn minutes_since_midnight(time: &str) -> i32 {
    let mut parts = time
        .split(':')
        .map(|part| part.trim().parse::<i32>().unwrap_or(0));
    let hours = parts.next().unwrap_or(0);
    let minutes = parts.next().unwrap_or(0);
    hours.saturating_mul(60).saturating_add(minutes)
}

/// Hours between two `HH:MM` times.
///
/// Negative when `end` precedes `start`; there is no wraparound past midnight.
pub fn calculate_hours_difference(start: &str, end: &str) -> f64 {
    let delta = minutes_since_midnight(end).saturating_sub(minutes_since_midnight(start));
    f64::from(delta) / 60.0
}

/// First `YYYY-MM-DD` substring of a file name, wherever it appears.
pub fn extract_date_from_filename(name: &str) -> Option<String> {
    DATE_RE.find(name).map(|m| m.as_str().to_string())
}
