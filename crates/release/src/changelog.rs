//! Changelog document model and parser.
//!
//! A changelog is a free-form preamble followed by an ordered list of
//! releases in Keep a Changelog layout:
//!
//! ```text
//! # Changelog
//!
//! ## [Unreleased]
//!
//! ## [1.1.0] - 2024-01-15
//!
//! ### Added
//!
//! - New feature X
//! ```

use crate::categorizer::{
    LineEvent, SectionState, classify_line, is_separator, is_task_checkbox, route_bullet,
};
use crate::category::{ChangeCategory, ChangeSet};
use crate::error::{Error, Result};
use crate::version::{Version, parse_version};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, warn};

#[allow(clippy::expect_used)]
static RELEASE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^##\s+(?:\[(?P<bracketed>[^\]]+)\]|(?P<bare>[^\s\[\]]+))(?:\s+-\s+(?P<date>.*?))?\s*$",
    )
    .expect("release heading pattern is valid")
});

#[allow(clippy::expect_used)]
static LINK_DEFINITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[^\]]+\]:\s*\S").expect("link definition pattern is valid")
});

/// Template used when no changelog exists yet.
pub const DEFAULT_CHANGELOG_TEMPLATE: &str = "# Changelog\n\nAll notable changes to this project will be documented in this file.\n\nThe format is based on [Keep a Changelog](https://keepachangelog.com/en/1.1.0/),\nand this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).\n\n## [Unreleased]\n";

/// Date on a release heading.
///
/// Dates written by the merger are always ISO-8601. Hand-written headings may
/// carry any text after ` - `; that text is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReleaseDate {
    /// An ISO-8601 calendar date.
    Iso(NaiveDate),
    /// Free-form date text that is not ISO-8601.
    Raw(String),
}

impl ReleaseDate {
    /// Parse heading date text, keeping it raw when it is not ISO-8601.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(NaiveDate::parse_from_str(text, "%Y-%m-%d").map_or_else(
            |_| Self::Raw(text.to_string()),
            Self::Iso,
        ))
    }

    /// The calendar date, if ISO-8601.
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Iso(date) => Some(*date),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iso(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

impl From<NaiveDate> for ReleaseDate {
    fn from(date: NaiveDate) -> Self {
        Self::Iso(date)
    }
}

/// A single release section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Release {
    /// Changes not yet tied to a version.
    Unreleased {
        /// Accumulated changes.
        changes: ChangeSet,
    },
    /// A published version.
    Released {
        /// Version of this release.
        version: Version,
        /// Release date; `None` only for hand-written headings without one.
        date: Option<ReleaseDate>,
        /// Changes in this release.
        changes: ChangeSet,
    },
}

impl Release {
    /// An empty `Unreleased` placeholder.
    #[must_use]
    pub fn unreleased() -> Self {
        Self::Unreleased {
            changes: ChangeSet::new(),
        }
    }

    /// An empty release for `version` dated `date`.
    #[must_use]
    pub fn released(version: Version, date: NaiveDate) -> Self {
        Self::Released {
            version,
            date: Some(ReleaseDate::Iso(date)),
            changes: ChangeSet::new(),
        }
    }

    /// The changes recorded in this release.
    #[must_use]
    pub const fn changes(&self) -> &ChangeSet {
        match self {
            Self::Unreleased { changes } | Self::Released { changes, .. } => changes,
        }
    }

    /// Mutable access to the changes recorded in this release.
    pub fn changes_mut(&mut self) -> &mut ChangeSet {
        match self {
            Self::Unreleased { changes } | Self::Released { changes, .. } => changes,
        }
    }

    /// The version, if released.
    #[must_use]
    pub const fn version(&self) -> Option<&Version> {
        match self {
            Self::Unreleased { .. } => None,
            Self::Released { version, .. } => Some(version),
        }
    }

    /// Whether this is the `Unreleased` section.
    #[must_use]
    pub const fn is_unreleased(&self) -> bool {
        matches!(self, Self::Unreleased { .. })
    }
}

/// A parsed changelog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    /// Raw text before the first release heading.
    pub preamble: String,
    /// Releases, newest first.
    pub releases: Vec<Release>,
    /// Link reference definitions (`[1.0.0]: https://...`) found after the
    /// first release heading, rendered after the last release.
    #[serde(default)]
    pub postamble: String,
}

/// Parsed form of a `## ...` release heading.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReleaseHeading {
    Unreleased,
    Released {
        version: Version,
        date: Option<ReleaseDate>,
    },
}

fn parse_release_heading(line: &str) -> Option<ReleaseHeading> {
    let caps = RELEASE_HEADING_RE.captures(line)?;
    let token = caps
        .name("bracketed")
        .or_else(|| caps.name("bare"))?
        .as_str()
        .trim();

    if token.eq_ignore_ascii_case("unreleased") {
        return Some(ReleaseHeading::Unreleased);
    }

    let version = parse_version(token)?;
    let date = caps.name("date").and_then(|m| ReleaseDate::parse(m.as_str()));
    if let Some(ReleaseDate::Raw(raw)) = &date {
        debug!(version = %version, date = %raw, "Release heading date is not ISO-8601");
    }
    Some(ReleaseHeading::Released { version, date })
}

/// Release being accumulated while scanning lines.
struct OpenRelease {
    release: Release,
    state: SectionState,
    /// Category of the last item, while continuation lines may still follow.
    last_item: Option<ChangeCategory>,
}

impl OpenRelease {
    fn new(heading: ReleaseHeading) -> Self {
        let release = match heading {
            ReleaseHeading::Unreleased => Release::unreleased(),
            ReleaseHeading::Released { version, date } => Release::Released {
                version,
                date,
                changes: ChangeSet::new(),
            },
        };
        Self {
            release,
            state: SectionState::NoActiveSection,
            last_item: None,
        }
    }

    fn feed(&mut self, line: &str) {
        if is_task_checkbox(line) {
            self.last_item = None;
            return;
        }
        match classify_line(line) {
            LineEvent::Heading(category) => {
                self.state = SectionState::InSection(category);
                self.last_item = None;
            }
            LineEvent::Bullet(content) => {
                let category = route_bullet(self.state);
                self.release.changes_mut().push(category, content);
                self.last_item = Some(category);
            }
            LineEvent::Other => {
                let is_continuation = line.starts_with([' ', '\t']) && !line.trim().is_empty();
                match self.last_item {
                    Some(category) if is_continuation => {
                        if let Some(item) = self.release.changes_mut().last_mut(category) {
                            item.push('\n');
                            item.push_str(line.trim_end());
                        }
                    }
                    _ => self.last_item = None,
                }
            }
        }
    }
}

impl Changelog {
    /// A document with no preamble and no releases.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse changelog text.
    ///
    /// Once the first release heading has been seen, parsing stops at the
    /// first top-level `---` separator; a `---` in the preamble (a horizontal
    /// rule or front-matter fence) is kept as preamble text. Task checkboxes
    /// are never part of a release body. Bullets that appear before any
    /// category heading in a release are filed under `Changed`. Link reference
    /// definitions inside the release list are collected into the postamble.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentParse`] if the document contains more than one
    /// `Unreleased` section.
    pub fn parse(text: &str) -> Result<Self> {
        let mut preamble = String::new();
        let mut postamble = String::new();
        let mut releases: Vec<Release> = Vec::new();
        let mut open: Option<OpenRelease> = None;

        for (idx, line) in text.lines().enumerate() {
            if open.is_some() && is_separator(line) {
                debug!(line = idx + 1, "Stopping changelog parse at separator");
                break;
            }

            if let Some(heading) = parse_release_heading(line) {
                if heading == ReleaseHeading::Unreleased
                    && (releases.iter().any(Release::is_unreleased)
                        || open.as_ref().is_some_and(|o| o.release.is_unreleased()))
                {
                    return Err(Error::document_parse(
                        "more than one Unreleased section",
                        Some(idx + 1),
                    ));
                }
                if let Some(done) = open.take() {
                    releases.push(done.release);
                }
                open = Some(OpenRelease::new(heading));
                continue;
            }

            match open.as_mut() {
                Some(current) if LINK_DEFINITION_RE.is_match(line) => {
                    current.last_item = None;
                    postamble.push_str(line.trim_end());
                    postamble.push('\n');
                }
                Some(current) => current.feed(line),
                None => {
                    preamble.push_str(line);
                    preamble.push('\n');
                }
            }
        }

        if let Some(done) = open {
            releases.push(done.release);
        }

        debug!(releases = releases.len(), "Parsed changelog");
        Ok(Self {
            preamble,
            releases,
            postamble,
        })
    }

    /// Parse changelog text, substituting an empty document on failure.
    #[must_use]
    pub fn parse_or_empty(text: &str) -> Self {
        Self::parse(text).unwrap_or_else(|err| {
            warn!(error = %err, "Failed to parse changelog, starting from an empty document");
            Self::empty()
        })
    }

    /// The `Unreleased` section, if present.
    #[must_use]
    pub fn unreleased(&self) -> Option<&Release> {
        self.releases.iter().find(|r| r.is_unreleased())
    }

    /// Find a released entry by version string (a leading `v` is ignored).
    #[must_use]
    pub fn find_release(&self, version: &str) -> Option<&Release> {
        let wanted = version.strip_prefix('v').unwrap_or(version);
        self.releases
            .iter()
            .find(|r| r.version().is_some_and(|v| v.to_string() == wanted))
    }

    /// The first released entry, which is treated as the newest.
    #[must_use]
    pub fn latest_release(&self) -> Option<&Release> {
        self.releases.iter().find(|r| !r.is_unreleased())
    }
}
