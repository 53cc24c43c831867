//! Release planner.
//!
//! Coordinates the full flow for a merged pull request: skip check, bump
//! decision, version calculation, PR categorization, changelog merge and
//! rendering.

use crate::categorizer::{categorize_changes, prepare_pr_body};
use crate::changelog::Changelog;
use crate::config::ReleaseConfig;
use crate::error::{Error, Result};
use crate::labels::{BumpDecision, LabelPolicy};
use crate::merge::merge_release;
use crate::render::{render_changelog, render_release_body};
use crate::sources::{ChangelogStore, TagSource};
use crate::tags::latest_tag;
use crate::version::{BumpType, Version, format_version, parse_version};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the text is not a valid date.
pub fn parse_release_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| Error::invalid_date(text))
}

/// Inputs for a single planning run.
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    /// Pull-request description, if any.
    pub pr_body: Option<String>,
    /// Pull-request labels.
    pub labels: Vec<String>,
    /// Latest version tag, if one exists.
    pub latest_tag: Option<String>,
    /// Current changelog text; `None` when the file does not exist.
    pub changelog: Option<String>,
    /// Release date.
    pub date: NaiveDate,
}

impl ReleaseRequest {
    /// Creates a request with no PR body, labels, tag or changelog.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            pr_body: None,
            labels: Vec::new(),
            latest_tag: None,
            changelog: None,
            date,
        }
    }

    /// Sets the PR description.
    #[must_use]
    pub fn with_pr_body(mut self, body: impl Into<String>) -> Self {
        self.pr_body = Some(body.into());
        self
    }

    /// Sets the PR labels.
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the latest known tag.
    #[must_use]
    pub fn with_latest_tag(mut self, tag: impl Into<String>) -> Self {
        self.latest_tag = Some(tag.into());
        self
    }

    /// Sets the current changelog text.
    #[must_use]
    pub fn with_changelog(mut self, text: impl Into<String>) -> Self {
        self.changelog = Some(text.into());
        self
    }
}

/// A fully prepared release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedRelease {
    /// Version the bump started from.
    pub previous: Version,
    /// New version.
    pub version: Version,
    /// Bump that was applied.
    pub bump: BumpType,
    /// Tag name for the new version.
    pub tag: String,
    /// New version without any prefix.
    pub bare: String,
    /// Full rendered changelog.
    pub changelog: String,
    /// Rendered body of the new release, for release notes.
    pub release_notes: String,
}

/// Result of a planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReleaseOutcome {
    /// A skip label matched; nothing was computed.
    Skipped {
        /// The skip labels that matched.
        matched_labels: Vec<String>,
    },
    /// A release was prepared.
    Prepared(Box<PreparedRelease>),
}

impl ReleaseOutcome {
    /// Whether the skip policy triggered.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// The prepared release, if any.
    #[must_use]
    pub fn prepared(&self) -> Option<&PreparedRelease> {
        match self {
            Self::Prepared(release) => Some(&**release),
            Self::Skipped { .. } => None,
        }
    }
}

/// Release planner.
///
/// Holds validated configuration; each [`ReleasePlanner::plan`] call is an
/// independent, pure transformation.
#[derive(Debug, Clone)]
pub struct ReleasePlanner {
    config: ReleaseConfig,
    policy: LabelPolicy,
    default_bump: BumpType,
}

impl ReleasePlanner {
    /// Creates a planner, validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBumpConfiguration`] if the default bump is not
    /// recognized.
    pub fn new(config: ReleaseConfig) -> Result<Self> {
        let default_bump = config.default_bump()?;
        let policy = config.label_policy();
        Ok(Self {
            config,
            policy,
            default_bump,
        })
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub const fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Resolve the version the bump starts from.
    ///
    /// A missing or malformed tag falls back to `0.0.0`.
    fn baseline(tag: Option<&str>) -> Version {
        match tag {
            Some(tag) => parse_version(tag.trim()).unwrap_or_else(|| {
                warn!(tag, "Latest tag is not a valid version, starting from 0.0.0");
                Version::default()
            }),
            None => {
                debug!("No previous tag, starting from 0.0.0");
                Version::default()
            }
        }
    }

    /// Plan a release from in-memory inputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionOverflow`] if the latest tag cannot be bumped.
    /// Malformed tags, PR text and changelog content are recovered.
    pub fn plan(&self, request: &ReleaseRequest) -> Result<ReleaseOutcome> {
        let bump = match self.policy.decide(request.labels.as_slice()) {
            BumpDecision::Skip { matched } => {
                info!(labels = ?matched, "Release skipped by label");
                return Ok(ReleaseOutcome::Skipped {
                    matched_labels: matched,
                });
            }
            BumpDecision::Bump(Some(bump)) => bump,
            BumpDecision::Bump(None) => {
                debug!(default = %self.default_bump, "No bump label, using default");
                self.default_bump
            }
        };

        let previous = Self::baseline(request.latest_tag.as_deref());
        let version = previous.bump(bump)?;
        let bare = format_version(&version, false);

        let pr_body = request.pr_body.as_deref().map(prepare_pr_body);
        let changes = categorize_changes(pr_body.as_deref());

        let source = request
            .changelog
            .as_deref()
            .unwrap_or(&self.config.changelog.template);
        let document = Changelog::parse_or_empty(source);
        let merged = merge_release(&document, &bare, request.date, &changes)?;

        let release_notes = merged
            .find_release(&bare)
            .map(render_release_body)
            .unwrap_or_default();
        let changelog = render_changelog(&merged);

        info!(
            previous = %previous,
            version = %version,
            bump = %bump,
            items = changes.len(),
            "Prepared release"
        );

        Ok(ReleaseOutcome::Prepared(Box::new(PreparedRelease {
            tag: self.config.format_tag(&version),
            previous,
            version,
            bump,
            bare,
            changelog,
            release_notes,
        })))
    }

    /// Plan a release using collaborators for tags and changelog storage.
    ///
    /// The rendered changelog is written back only when a release was
    /// prepared.
    ///
    /// # Errors
    ///
    /// Returns an error if a collaborator fails.
    pub fn run(
        &self,
        tags: &dyn TagSource,
        store: &dyn ChangelogStore,
        pr_body: Option<&str>,
        labels: &[String],
        date: NaiveDate,
    ) -> Result<ReleaseOutcome> {
        let tag_list = tags.list_tags()?;
        let latest = latest_tag(tag_list.as_slice()).map(str::to_string);

        let changelog = store.read()?;
        if changelog.is_none() {
            info!("No changelog found, starting from template");
        }

        let request = ReleaseRequest {
            pr_body: pr_body.map(str::to_string),
            labels: labels.to_vec(),
            latest_tag: latest,
            changelog,
            date,
        };

        let outcome = self.plan(&request)?;
        if let ReleaseOutcome::Prepared(release) = &outcome {
            store.write(&release.changelog)?;
        }
        Ok(outcome)
    }

    /// Body of the named release in an existing changelog, if present.
    #[must_use]
    pub fn release_notes_for(changelog: &str, version: &str) -> Option<String> {
        Changelog::parse_or_empty(changelog)
            .find_release(version)
            .map(render_release_body)
    }
}
