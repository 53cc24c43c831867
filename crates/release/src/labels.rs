//! Label-driven bump policy.
//!
//! Pull-request labels decide whether a release happens at all and, if so,
//! how large the version increment is. Tiers are checked in strict
//! precedence: major, then minor, then patch.

use crate::version::BumpType;
use std::collections::BTreeSet;

/// Parse a comma-separated label list into a normalized set.
///
/// Labels are trimmed and lowercased; empty entries are dropped.
#[must_use]
pub fn parse_label_list(csv: &str) -> BTreeSet<String> {
    csv.split(',')
        .map(|label| label.trim().to_lowercase())
        .filter(|label| !label.is_empty())
        .collect()
}

fn normalize<S: AsRef<str>>(labels: &[S]) -> BTreeSet<String> {
    labels
        .iter()
        .map(|l| l.as_ref().trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Determine the bump tier from PR labels.
///
/// Returns `None` when no configured tier matches; the caller falls back to
/// its configured default bump.
#[must_use]
pub fn determine_bump_type<S: AsRef<str>>(
    pr_labels: &[S],
    major_labels: &BTreeSet<String>,
    minor_labels: &BTreeSet<String>,
    patch_labels: &BTreeSet<String>,
) -> Option<BumpType> {
    let labels = normalize(pr_labels);
    [
        (BumpType::Major, major_labels),
        (BumpType::Minor, minor_labels),
        (BumpType::Patch, patch_labels),
    ]
    .into_iter()
    .find(|(_, tier)| !labels.is_disjoint(tier))
    .map(|(bump, _)| bump)
}

/// Whether any PR label is configured to suppress the release.
#[must_use]
pub fn should_skip_release<S: AsRef<str>>(pr_labels: &[S], skip_labels: &BTreeSet<String>) -> bool {
    !normalize(pr_labels).is_disjoint(skip_labels)
}

/// Outcome of evaluating a label set against a [`LabelPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpDecision {
    /// A skip label matched; no release work should happen.
    Skip {
        /// The skip labels that matched, sorted.
        matched: Vec<String>,
    },
    /// Release with the given tier, or the caller's default when `None`.
    Bump(Option<BumpType>),
}

/// The configured label sets for each tier plus the skip set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPolicy {
    /// Labels that force a major bump.
    pub major: BTreeSet<String>,
    /// Labels that request a minor bump.
    pub minor: BTreeSet<String>,
    /// Labels that request a patch bump.
    pub patch: BTreeSet<String>,
    /// Labels that skip the release entirely.
    pub skip: BTreeSet<String>,
}

impl LabelPolicy {
    /// Build a policy from comma-separated label lists.
    #[must_use]
    pub fn from_csv(major: &str, minor: &str, patch: &str, skip: &str) -> Self {
        Self {
            major: parse_label_list(major),
            minor: parse_label_list(minor),
            patch: parse_label_list(patch),
            skip: parse_label_list(skip),
        }
    }

    /// Evaluate PR labels. The skip check runs before bump determination.
    #[must_use]
    pub fn decide<S: AsRef<str>>(&self, pr_labels: &[S]) -> BumpDecision {
        if should_skip_release(pr_labels, &self.skip) {
            let matched = normalize(pr_labels)
                .intersection(&self.skip)
                .cloned()
                .collect();
            return BumpDecision::Skip { matched };
        }
        BumpDecision::Bump(determine_bump_type(
            pr_labels,
            &self.major,
            &self.minor,
            &self.patch,
        ))
    }
}
