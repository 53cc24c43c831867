//! Release configuration types.
//!
//! Configuration mirrors the inputs a release workflow is invoked with:
//! label lists as comma-separated strings, a default bump, a tag prefix and
//! the changelog location. It can be loaded from TOML or JSON.

use crate::changelog::DEFAULT_CHANGELOG_TEMPLATE;
use crate::error::{Error, Result};
use crate::labels::LabelPolicy;
use crate::version::{BumpType, Version};
use serde::{Deserialize, Serialize};

/// Complete release configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Label lists per bump tier.
    pub labels: LabelConfig,
    /// Bump applied when no label matches (`major`, `minor` or `patch`).
    #[serde(rename = "defaultBump")]
    pub default_bump: String,
    /// Prefix for release tags.
    #[serde(rename = "tagPrefix")]
    pub tag_prefix: String,
    /// Changelog location and template.
    pub changelog: ChangelogConfig,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            labels: LabelConfig::default(),
            default_bump: BumpType::Patch.to_string(),
            tag_prefix: "v".to_string(),
            changelog: ChangelogConfig::default(),
        }
    }
}

impl ReleaseConfig {
    /// Load configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the TOML is malformed.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| {
            Error::config(
                format!("invalid TOML configuration: {e}"),
                "Check the release configuration file syntax",
            )
        })
    }

    /// Load configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is malformed.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| {
            Error::config(
                format!("invalid JSON configuration: {e}"),
                "Check the release configuration file syntax",
            )
        })
    }

    /// The configured default bump.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBumpConfiguration`] for anything other than
    /// `major`, `minor` or `patch`.
    pub fn default_bump(&self) -> Result<BumpType> {
        self.default_bump.parse()
    }

    /// Validate the configuration before any release work starts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBumpConfiguration`] if the default bump is not
    /// recognized.
    pub fn validate(&self) -> Result<()> {
        self.default_bump().map(|_| ())
    }

    /// Build the label policy from the configured lists.
    #[must_use]
    pub fn label_policy(&self) -> LabelPolicy {
        LabelPolicy::from_csv(
            &self.labels.major,
            &self.labels.minor,
            &self.labels.patch,
            &self.labels.skip,
        )
    }

    /// Format a tag name from a version.
    #[must_use]
    pub fn format_tag(&self, version: &Version) -> String {
        format!("{}{}", self.tag_prefix, version)
    }
}

/// Comma-separated label lists for each tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Labels that force a major bump.
    pub major: String,
    /// Labels that request a minor bump.
    pub minor: String,
    /// Labels that request a patch bump.
    pub patch: String,
    /// Labels that skip the release.
    pub skip: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            major: "major,breaking".to_string(),
            minor: "minor,feature,enhancement".to_string(),
            patch: "patch,fix,bugfix".to_string(),
            skip: "skip-release,no-release".to_string(),
        }
    }
}

/// Changelog file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Path to the changelog relative to the repository root.
    pub path: String,
    /// Text used when the changelog does not exist yet.
    pub template: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            path: "CHANGELOG.md".to_string(),
            template: DEFAULT_CHANGELOG_TEMPLATE.to_string(),
        }
    }
}
