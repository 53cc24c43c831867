//! Merging pending changes into a versioned release.

use crate::category::ChangeSet;
use crate::changelog::{Changelog, Release};
use crate::error::{Error, Result};
use crate::version::parse_version;
use chrono::NaiveDate;
use tracing::debug;

/// Merge the `Unreleased` section and PR-sourced changes into `version`.
///
/// Returns a new document; `changelog` is left untouched.
///
/// - If no release for `version` exists, an empty one dated `date` is
///   inserted immediately before the first existing released entry. New
///   releases are always treated as the newest, whatever their number.
/// - Items from an `Unreleased` section are appended to the target release
///   and the section is replaced by an empty placeholder.
/// - `pr_changes` are appended last.
///
/// Merging is strictly additive: existing items are never replaced or
/// deduplicated.
///
/// # Errors
///
/// Returns [`Error::InvalidVersion`] if `version` (after stripping a leading
/// `v`) is not a valid version.
pub fn merge_release(
    changelog: &Changelog,
    version: &str,
    date: NaiveDate,
    pr_changes: &ChangeSet,
) -> Result<Changelog> {
    let normalized = version.strip_prefix('v').unwrap_or(version);
    let parsed = parse_version(normalized).ok_or_else(|| Error::invalid_version(version))?;

    let mut releases = changelog.releases.clone();

    let target_idx = if let Some(idx) = releases
        .iter()
        .position(|r| r.version().is_some_and(|v| v.to_string() == normalized))
    {
        debug!(version = normalized, "Merging into existing release");
        idx
    } else {
        let idx = releases
            .iter()
            .position(|r| !r.is_unreleased())
            .unwrap_or(releases.len());
        debug!(version = normalized, position = idx, "Inserting new release");
        releases.insert(idx, Release::released(parsed, date));
        idx
    };

    if let Some(unreleased_idx) = releases.iter().position(Release::is_unreleased) {
        let pending = std::mem::replace(&mut releases[unreleased_idx], Release::unreleased());
        debug!(
            items = pending.changes().len(),
            "Moving Unreleased items into release"
        );
        releases[target_idx]
            .changes_mut()
            .extend_from(pending.changes());
    }

    releases[target_idx].changes_mut().extend_from(pr_changes);

    Ok(Changelog {
        preamble: changelog.preamble.clone(),
        releases,
        postamble: changelog.postamble.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ChangeCategory;
    use crate::changelog::ReleaseDate;
    use crate::render::render_changelog;
    use crate::version::Version;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unreleased_and_pr_changes_merge_in_order() {
        let doc = Changelog::parse("## [Unreleased]\n### Added\n- A\n").unwrap();
        let pr = ChangeSet::new().with(ChangeCategory::Added, "B");

        let merged = merge_release(&doc, "1.1.0", date(2024, 1, 15), &pr).unwrap();

        assert_eq!(merged.releases.len(), 2);
        assert!(merged.releases[0].is_unreleased());
        assert!(merged.releases[0].changes().is_empty());

        let release = merged.find_release("1.1.0").unwrap();
        assert_eq!(release.changes().get(ChangeCategory::Added), ["A", "B"]);
    }

    #[test]
    fn test_input_document_untouched() {
        let doc = Changelog::parse("## [Unreleased]\n### Fixed\n- bug\n").unwrap();
        let before = doc.clone();
        let _ = merge_release(&doc, "v0.2.0", date(2024, 5, 1), &ChangeSet::new()).unwrap();
        assert_eq!(doc, before);
    }

    #[test]
    fn test_existing_release_is_additive() {
        let doc = Changelog::parse(
            "## [2.0.0] - 2024-03-01\n### Changed\n- Hand-written note\n## [1.0.0] - 2024-01-01\n",
        )
        .unwrap();
        let pr = ChangeSet::new()
            .with(ChangeCategory::Changed, "Hand-written note")
            .with(ChangeCategory::Fixed, "From PR");

        let merged = merge_release(&doc, "v2.0.0", date(2024, 3, 9), &pr).unwrap();

        assert_eq!(merged.releases.len(), 2);
        let release = &merged.releases[0];
        assert_eq!(
            release.changes().get(ChangeCategory::Changed),
            ["Hand-written note", "Hand-written note"]
        );
        assert_eq!(release.changes().get(ChangeCategory::Fixed), ["From PR"]);
        // The existing date is kept.
        assert!(matches!(
            release,
            Release::Released { date: Some(ReleaseDate::Iso(d)), .. } if *d == date(2024, 3, 1)
        ));
    }

    #[test]
    fn test_new_release_inserted_before_first_released() {
        let doc = Changelog::parse(
            "# Changelog\n## [Unreleased]\n## [0.5.0] - 2024-01-01\n## [3.0.0] - 2023-01-01\n",
        )
        .unwrap();

        let merged = merge_release(&doc, "1.0.0", date(2024, 6, 1), &ChangeSet::new()).unwrap();

        let versions: Vec<_> = merged
            .releases
            .iter()
            .map(|r| r.version().map(ToString::to_string))
            .collect();
        assert_eq!(
            versions,
            [
                None,
                Some("1.0.0".to_string()),
                Some("0.5.0".to_string()),
                Some("3.0.0".to_string())
            ]
        );
    }

    #[test]
    fn test_unreleased_after_releases_is_emptied_in_place() {
        let doc = Changelog {
            preamble: String::new(),
            releases: vec![
                Release::released(Version::new(1, 0, 0), date(2024, 1, 1)),
                Release::Unreleased {
                    changes: ChangeSet::new().with(ChangeCategory::Removed, "old flag"),
                },
            ],
            postamble: String::new(),
        };

        let merged = merge_release(&doc, "1.1.0", date(2024, 2, 1), &ChangeSet::new()).unwrap();

        assert_eq!(merged.releases.len(), 3);
        assert_eq!(
            merged.releases[0].changes().get(ChangeCategory::Removed),
            ["old flag"]
        );
        assert_eq!(merged.releases[2], Release::unreleased());
    }

    #[test]
    fn test_hand_written_content_preserved() {
        let doc = Changelog::parse(
            "# Changelog\n\n## [1.0.0] - Jan 5, 2024\n\n- Initial release\n\n[1.0.0]: https://example.com/v1.0.0\n",
        )
        .unwrap();
        let pr = ChangeSet::new().with(ChangeCategory::Added, "Export");

        let merged = merge_release(&doc, "1.1.0", date(2024, 2, 1), &pr).unwrap();
        let output = render_changelog(&merged);

        assert!(output.contains("## [1.0.0] - Jan 5, 2024\n"));
        assert!(output.ends_with("\n\n[1.0.0]: https://example.com/v1.0.0\n"));
        assert_eq!(merged.postamble, doc.postamble);
    }

    #[test]
    fn test_empty_document() {
        let pr = ChangeSet::new().with(ChangeCategory::Security, "rotate keys");
        let merged = merge_release(&Changelog::empty(), "0.1.0", date(2024, 1, 1), &pr).unwrap();
        assert_eq!(merged.releases.len(), 1);
        assert_eq!(
            merged.releases[0].changes().get(ChangeCategory::Security),
            ["rotate keys"]
        );
    }

    #[test]
    fn test_invalid_target_version() {
        let result = merge_release(&Changelog::empty(), "next", date(2024, 1, 1), &ChangeSet::new());
        assert!(matches!(result, Err(Error::InvalidVersion { .. })));
    }
}
