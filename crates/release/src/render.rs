//! Canonical changelog rendering.

use crate::category::ChangeSet;
use crate::changelog::{Changelog, Release};
use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static BARE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^## (\d+\.\d+\.\d+(?:-[^\s\]]+)?)([ \t].*)?$")
        .expect("bare heading pattern is valid")
});

/// Heading line for a release, without trailing newline.
#[must_use]
pub fn release_heading(release: &Release) -> String {
    match release {
        Release::Unreleased { .. } => "## [Unreleased]".to_string(),
        Release::Released {
            version,
            date: Some(date),
            ..
        } => format!("## [{version}] - {date}"),
        Release::Released {
            version,
            date: None,
            ..
        } => format!("## [{version}]"),
    }
}

fn render_changes(changes: &ChangeSet) -> String {
    let mut output = String::new();
    for (category, items) in changes.non_empty() {
        let _ = writeln!(output, "### {category}\n");
        for item in items {
            let _ = writeln!(output, "- {item}");
        }
        output.push('\n');
    }
    output
}

/// Render the body of a single release: its category sections, no heading.
///
/// Categories appear in canonical order and empty ones are omitted. The
/// result is what gets published as release notes.
#[must_use]
pub fn render_release_body(release: &Release) -> String {
    let body = render_changes(release.changes());
    let trimmed = body.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}

/// Rewrite bare `## 1.2.3` headings into bracketed `## [1.2.3]` form.
///
/// Idempotent; anything after the version on the line is kept.
#[must_use]
pub fn normalize_headings(text: &str) -> String {
    BARE_HEADING_RE
        .replace_all(text, "## [${1}]${2}")
        .into_owned()
}

/// Render a whole document in canonical form.
///
/// Link reference definitions follow the last release after a blank line.
/// Output ends with exactly one newline.
#[must_use]
pub fn render_changelog(changelog: &Changelog) -> String {
    let mut output = String::new();

    let preamble = changelog.preamble.trim_end();
    if !preamble.is_empty() {
        output.push_str(preamble);
        output.push_str("\n\n");
    }

    for release in &changelog.releases {
        let _ = writeln!(output, "{}\n", release_heading(release));
        output.push_str(&render_changes(release.changes()));
    }

    let postamble = changelog.postamble.trim();
    if !postamble.is_empty() {
        output.truncate(output.trim_end().len());
        if !output.is_empty() {
            output.push_str("\n\n");
        }
        output.push_str(postamble);
    }

    let mut text = normalize_headings(output.trim_end());
    text.push('\n');
    text
}
