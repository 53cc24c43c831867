//! Changelog synthesis and version-bump decisions for shipnote.
//!
//! This crate turns a merged pull request (its free-form description and its
//! labels) plus the project's existing Keep a Changelog document into a new
//! semantic version, an updated changelog, and the release-note body for the
//! new version.
//!
//! # Architecture
//!
//! The crate is organized leaves first:
//!
//! - [`version`] - Version parsing, formatting and bumping
//! - [`labels`] - Label-driven bump policy and skip decision
//! - [`category`] - The six change categories and [`ChangeSet`]
//! - [`categorizer`] - PR description classification
//! - [`changelog`] - Changelog document model and parser
//! - [`merge`] - Merging pending changes into a release
//! - [`render`] - Canonical rendering and release-note bodies
//! - [`planner`] - End-to-end release planning
//!
//! The engine does no I/O of its own: tag listing and changelog storage go
//! through the [`sources`] traits.
//!
//! # Example
//!
//! ```rust,ignore
//! use shipnote_release::{ReleaseConfig, ReleasePlanner, ReleaseRequest};
//! use chrono::NaiveDate;
//!
//! let planner = ReleasePlanner::new(ReleaseConfig::default())?;
//! let request = ReleaseRequest::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
//!     .with_labels(["feature"])
//!     .with_latest_tag("v1.0.0")
//!     .with_pr_body("### Added\n- New feature X")
//!     .with_changelog(std::fs::read_to_string("CHANGELOG.md")?);
//!
//! if let Some(release) = planner.plan(&request)?.prepared() {
//!     println!("{} -> {}", release.previous, release.tag);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod categorizer;
pub mod category;
pub mod changelog;
pub mod config;
pub mod error;
pub mod labels;
pub mod merge;
pub mod planner;
pub mod render;
pub mod sources;
pub mod tags;
pub mod version;

// Re-export main types
pub use categorizer::{categorize_changes, prepare_pr_body};
pub use category::{ChangeCategory, ChangeSet};
pub use changelog::{Changelog, DEFAULT_CHANGELOG_TEMPLATE, Release, ReleaseDate};
pub use config::{ChangelogConfig, LabelConfig, ReleaseConfig};
pub use error::{Error, Result};
pub use labels::{
    BumpDecision, LabelPolicy, determine_bump_type, parse_label_list, should_skip_release,
};
pub use merge::merge_release;
pub use planner::{
    PreparedRelease, ReleaseOutcome, ReleasePlanner, ReleaseRequest, parse_release_date,
};
pub use render::{normalize_headings, render_changelog, render_release_body};
pub use sources::{
    ChangelogStore, FileChangelogStore, GitTagSource, MemoryChangelogStore, StaticTags, TagSource,
};
pub use tags::latest_tag;
pub use version::{BumpType, Version, format_version, parse_version};
