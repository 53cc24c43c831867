//! Semantic version parsing, formatting and bumping.
//!
//! Versions are `MAJOR.MINOR.PATCH` with an optional `-prerelease` suffix.
//! A leading `v` is accepted when parsing and emitted only on request.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)(?:-(.+))?$").expect("version pattern is valid")
});

/// Magnitude of a version increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    /// Bug fixes; increments the patch number.
    Patch,
    /// New functionality; increments the minor number.
    Minor,
    /// Breaking changes; increments the major number.
    Major,
}

impl BumpType {
    /// Lowercase name as used in labels and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            _ => Err(Error::invalid_bump(s)),
        }
    }
}

/// A semantic version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Major version number.
    pub major: u64,
    /// Minor version number.
    pub minor: u64,
    /// Patch version number.
    pub patch: u64,
    /// Pre-release identifier (e.g., "alpha", "beta.1").
    pub prerelease: Option<String>,
}

impl Version {
    /// Create a new release version.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Create a version with a pre-release identifier.
    #[must_use]
    pub fn with_prerelease(mut self, prerelease: impl Into<String>) -> Self {
        self.prerelease = Some(prerelease.into());
        self
    }

    /// Apply a bump to this version.
    ///
    /// The pre-release suffix is always dropped: bumping produces a release
    /// version, never a pre-release.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionOverflow`] if the bumped component is already
    /// `u64::MAX`.
    pub fn bump(&self, bump_type: BumpType) -> Result<Self> {
        let next = match bump_type {
            BumpType::Major => self.major.checked_add(1).map(|major| Self::new(major, 0, 0)),
            BumpType::Minor => self
                .minor
                .checked_add(1)
                .map(|minor| Self::new(self.major, minor, 0)),
            BumpType::Patch => self
                .patch
                .checked_add(1)
                .map(|patch| Self::new(self.major, self.minor, patch)),
        };
        next.ok_or_else(|| Error::version_overflow(self.to_string(), bump_type))
    }

    /// Check if this is a pre-release version.
    #[must_use]
    pub const fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Render with a leading `v`.
    #[must_use]
    pub fn to_tag(&self) -> String {
        format_version(self, true)
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Parse a version string, returning `None` if it is not a valid version.
///
/// Accepts an optional leading `v`. Short forms such as `1.2` are rejected.
#[must_use]
pub fn parse_version(text: &str) -> Option<Version> {
    let caps = VERSION_RE.captures(text)?;
    Some(Version {
        major: caps[1].parse().ok()?,
        minor: caps[2].parse().ok()?,
        patch: caps[3].parse().ok()?,
        prerelease: caps.get(4).map(|m| m.as_str().to_string()),
    })
}

/// Render a version as `[v]major.minor.patch[-prerelease]`.
#[must_use]
pub fn format_version(version: &Version, include_v_prefix: bool) -> String {
    if include_v_prefix {
        format!("v{version}")
    } else {
        version.to_string()
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_version(s.trim()).ok_or_else(|| Error::invalid_version(s))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ref pre) = self.prerelease {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            // Pre-release versions have lower precedence
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_new() {
        let v = Version::new(1, 2, 3);
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
        assert!(v.prerelease.is_none());
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version("v1.2.3"), Some(Version::new(1, 2, 3)));

        let v = parse_version("1.2.3-beta.1").unwrap();
        assert_eq!(v.prerelease.as_deref(), Some("beta.1"));
    }

    #[test]
    fn test_parse_version_invalid() {
        assert_eq!(parse_version("1.2"), None);
        assert_eq!(parse_version("1.2.3.4"), None);
        assert_eq!(parse_version("a.b.c"), None);
        assert_eq!(parse_version(""), None);
        assert_eq!(parse_version("V1.2.3"), None);
        assert_eq!(parse_version("1.2.3-"), None);
        assert_eq!(parse_version("release-1.2.3"), None);
    }

    #[test]
    fn test_parse_version_overflow() {
        assert_eq!(parse_version("99999999999999999999.0.0"), None);
    }

    #[test]
    fn test_from_str() {
        let v: Version = " v2.0.1 ".parse().unwrap();
        assert_eq!(v, Version::new(2, 0, 1));
        assert!(matches!(
            "1.2".parse::<Version>(),
            Err(Error::InvalidVersion { .. })
        ));
    }

    #[test]
    fn test_format_version() {
        let v = Version::new(1, 2, 3).with_prerelease("rc.1");
        assert_eq!(format_version(&v, false), "1.2.3-rc.1");
        assert_eq!(format_version(&v, true), "v1.2.3-rc.1");
        assert_eq!(Version::new(0, 1, 0).to_tag(), "v0.1.0");
    }

    #[test]
    fn test_format_parse_round_trip() {
        let versions = [
            Version::new(0, 0, 0),
            Version::new(10, 20, 30),
            Version::new(1, 0, 0).with_prerelease("alpha"),
        ];
        for v in versions {
            assert_eq!(parse_version(&format_version(&v, true)), Some(v.clone()));
            assert_eq!(parse_version(&format_version(&v, false)), Some(v));
        }
    }

    #[test]
    fn test_version_bump() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(BumpType::Patch).unwrap(), Version::new(1, 2, 4));
        assert_eq!(v.bump(BumpType::Minor).unwrap(), Version::new(1, 3, 0));
        assert_eq!(v.bump(BumpType::Major).unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_overflow() {
        let v = parse_version("v18446744073709551615.0.0").unwrap();
        assert!(matches!(
            v.bump(BumpType::Major),
            Err(Error::VersionOverflow { .. })
        ));
        // Lower tiers are unaffected by a saturated major.
        assert_eq!(
            v.bump(BumpType::Minor).unwrap(),
            Version::new(u64::MAX, 1, 0)
        );

        let v = Version::new(1, u64::MAX, u64::MAX);
        assert!(v.bump(BumpType::Minor).is_err());
        assert!(v.bump(BumpType::Patch).is_err());
        assert_eq!(v.bump(BumpType::Major).unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_bump_drops_prerelease() {
        let v = Version::new(1, 2, 3).with_prerelease("beta");
        assert_eq!(v.bump(BumpType::Patch).unwrap(), Version::new(1, 2, 4));
        assert!(!v.bump(BumpType::Major).unwrap().is_prerelease());
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(2, 0, 0) > Version::new(1, 9, 9));
        assert!(Version::new(1, 1, 0) > Version::new(1, 0, 5));
        assert!(Version::new(1, 0, 1) > Version::new(1, 0, 0));
        assert!(Version::new(1, 0, 0) > Version::new(1, 0, 0).with_prerelease("alpha"));
    }

    #[test]
    fn test_bump_type_from_str() {
        assert_eq!("major".parse::<BumpType>().unwrap(), BumpType::Major);
        assert_eq!(" Minor ".parse::<BumpType>().unwrap(), BumpType::Minor);
        assert_eq!("PATCH".parse::<BumpType>().unwrap(), BumpType::Patch);
        assert!(matches!(
            "none".parse::<BumpType>(),
            Err(Error::InvalidBumpConfiguration { .. })
        ));
    }

    #[test]
    fn test_bump_type_ordering() {
        assert!(BumpType::Major > BumpType::Minor);
        assert!(BumpType::Minor > BumpType::Patch);
        assert_eq!(BumpType::Minor.to_string(), "minor");
    }
}
