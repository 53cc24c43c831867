//! Latest-tag selection.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static SEMVER_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?\d+\.\d+\.\d+").expect("tag pattern is valid"));

/// Whether a tag starts with a semver-like version.
#[must_use]
pub fn is_version_tag(tag: &str) -> bool {
    SEMVER_TAG_RE.is_match(tag.trim())
}

/// Pick the latest version tag from a list.
///
/// The first entry that looks like a version wins; no numeric maximum is
/// computed, so callers must list tags most-recent-first.
#[must_use]
pub fn latest_tag<S: AsRef<str>>(tags: &[S]) -> Option<&str> {
    tags.iter()
        .map(|tag| tag.as_ref().trim())
        .find(|tag| is_version_tag(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let tags = ["nightly", "v1.2.0", "v2.0.0", "1.9.0"];
        assert_eq!(latest_tag(&tags), Some("v1.2.0"));
    }

    #[test]
    fn test_prefix_match_only() {
        assert!(is_version_tag("v1.2.3-beta"));
        assert!(is_version_tag("1.2.3.4"));
        assert!(!is_version_tag("release-1.2.3"));
        assert!(!is_version_tag("v1.2"));
    }

    #[test]
    fn test_no_version_tags() {
        let tags = vec!["latest".to_string(), "stable".to_string()];
        assert_eq!(latest_tag(tags.as_slice()), None);
        let empty: [&str; 0] = [];
        assert_eq!(latest_tag(&empty), None);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let tags = ["  v0.3.1\n"];
        assert_eq!(latest_tag(&tags), Some("v0.3.1"));
    }
}
