//! Pull-request description categorization.
//!
//! PR descriptions are free-form markdown. [`categorize_changes`] runs a small
//! two-state line classifier over them:
//!
//! ```text
//!               Heading(c)                 Heading(c')
//! NoActiveSection ────────▶ InSection(c) ────────────▶ InSection(c')
//! ```
//!
//! Bullets are routed by [`detect_prefix`] first (a conventional prefix wins
//! regardless of state) and by [`route_bullet`] second.

use crate::category::{ChangeCategory, ChangeSet};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

#[allow(clippy::expect_used)]
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#+\s*(added|changed|deprecated|removed|fixed|security)\s*$")
        .expect("heading pattern is valid")
});

#[allow(clippy::expect_used)]
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+(.+)$").expect("bullet pattern is valid"));

#[allow(clippy::expect_used)]
static CHECKBOX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*]\s+\[[ xX]\]").expect("checkbox pattern is valid"));

/// Conventional prefixes and the category each one maps to.
const PREFIXES: &[(&str, ChangeCategory)] = &[
    ("feat:", ChangeCategory::Added),
    ("add:", ChangeCategory::Added),
    ("fix:", ChangeCategory::Fixed),
    ("bug:", ChangeCategory::Fixed),
    ("remove:", ChangeCategory::Removed),
    ("delete:", ChangeCategory::Removed),
    ("deprecate:", ChangeCategory::Deprecated),
    ("security:", ChangeCategory::Security),
];

/// A classified input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent<'a> {
    /// A heading naming one of the six categories.
    Heading(ChangeCategory),
    /// A top-level bullet with its content.
    Bullet(&'a str),
    /// Anything else: prose, blank lines, unrecognized headings.
    Other,
}

/// Classifier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SectionState {
    /// No category heading seen yet.
    #[default]
    NoActiveSection,
    /// Inside the section of the given category.
    InSection(ChangeCategory),
}

/// Classify a single line.
#[must_use]
pub fn classify_line(line: &str) -> LineEvent<'_> {
    if let Some(caps) = HEADING_RE.captures(line)
        && let Some(category) = caps.get(1).and_then(|m| ChangeCategory::from_name(m.as_str()))
    {
        return LineEvent::Heading(category);
    }
    match BULLET_RE.captures(line).and_then(|caps| caps.get(1)) {
        Some(content) if !content.as_str().trim().is_empty() => LineEvent::Bullet(content.as_str()),
        _ => LineEvent::Other,
    }
}

/// Detect a conventional prefix (`feat:`, `fix:`, ...) at the start of a bullet.
///
/// Returns the mapped category and the remainder with the prefix stripped.
/// A prefix with nothing after it is not treated as a match.
#[must_use]
pub fn detect_prefix(content: &str) -> Option<(ChangeCategory, &str)> {
    PREFIXES.iter().find_map(|(prefix, category)| {
        let head = content.get(..prefix.len())?;
        if !head.eq_ignore_ascii_case(prefix) {
            return None;
        }
        let rest = content[prefix.len()..].trim();
        (!rest.is_empty()).then_some((*category, rest))
    })
}

/// Route an unprefixed bullet by section state; `Changed` is the default bucket.
#[must_use]
pub const fn route_bullet(state: SectionState) -> ChangeCategory {
    match state {
        SectionState::InSection(category) => category,
        SectionState::NoActiveSection => ChangeCategory::Changed,
    }
}

/// Categorize a PR description into a [`ChangeSet`].
///
/// `None` and empty input yield a change set with every category empty.
#[must_use]
pub fn categorize_changes(text: Option<&str>) -> ChangeSet {
    let mut changes = ChangeSet::new();
    let Some(text) = text else {
        return changes;
    };

    let mut state = SectionState::NoActiveSection;
    for line in text.lines() {
        match classify_line(line) {
            LineEvent::Heading(category) => state = SectionState::InSection(category),
            LineEvent::Bullet(content) => {
                if let Some((category, rest)) = detect_prefix(content) {
                    changes.push(category, rest);
                } else {
                    changes.push(route_bullet(state), content);
                }
            }
            LineEvent::Other => {}
        }
    }

    debug!(items = changes.len(), "Categorized PR description");
    changes
}

/// Whether a line is a markdown task checkbox (`- [ ]` / `- [x]`).
#[must_use]
pub fn is_task_checkbox(line: &str) -> bool {
    CHECKBOX_RE.is_match(line)
}

/// Whether a line is a top-level `---` separator.
#[must_use]
pub fn is_separator(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Strip review noise from a PR description before categorization.
///
/// Everything from the first `---` separator onwards (test plans, scratch
/// notes) is dropped, as are task checkboxes.
#[must_use]
pub fn prepare_pr_body(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if is_separator(line) {
            break;
        }
        if is_task_checkbox(line) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
