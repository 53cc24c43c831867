//! Error types for changelog and version operations.

use crate::version::BumpType;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning a release.
///
/// Malformed content (tags, changelog text, PR descriptions) is recovered
/// locally wherever possible; the variants here are reserved for broken
/// invocations and collaborator failures.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Failed to parse or validate a version string.
    #[error("Invalid version: {version}")]
    #[diagnostic(
        code(shipnote::release::invalid_version),
        help("Version must look like MAJOR.MINOR.PATCH with an optional v prefix and -prerelease suffix")
    )]
    InvalidVersion {
        /// The invalid version string
        version: String,
    },

    /// Bumping would overflow a version component.
    #[error("Cannot apply {bump} bump to {version}: component overflow")]
    #[diagnostic(
        code(shipnote::release::version_overflow),
        help("The latest tag is at the largest representable version; tag a lower version manually")
    )]
    VersionOverflow {
        /// The version that could not be bumped
        version: String,
        /// The bump that was requested
        bump: BumpType,
    },

    /// The configured default bump is not one of major, minor or patch.
    #[error("Invalid bump configuration: {value:?}")]
    #[diagnostic(
        code(shipnote::release::invalid_bump),
        help("Set the default bump to one of: major, minor, patch")
    )]
    InvalidBumpConfiguration {
        /// The rejected configuration value
        value: String,
    },

    /// The changelog document could not be parsed.
    #[error("Changelog parse error: {message}")]
    #[diagnostic(
        code(shipnote::release::document_parse),
        help("Check the changelog follows the Keep a Changelog layout")
    )]
    DocumentParse {
        /// The error message
        message: String,
        /// One-based line number where parsing failed
        line: Option<usize>,
    },

    /// Failed to read or write the changelog file.
    #[error("Changelog I/O error: {message}")]
    #[diagnostic(
        code(shipnote::release::changelog_io),
        help("Check that the changelog path exists and is writable")
    )]
    ChangelogIo {
        /// The error message
        message: String,
        /// The path that caused the error
        path: Option<PathBuf>,
        /// The underlying source error
        #[source]
        source: std::io::Error,
    },

    /// A release date could not be parsed.
    #[error("Invalid release date: {value:?}")]
    #[diagnostic(
        code(shipnote::release::invalid_date),
        help("Dates must be ISO-8601 calendar dates, e.g. 2024-01-15")
    )]
    InvalidDate {
        /// The rejected date string
        value: String,
    },

    /// Configuration error.
    #[error("Release configuration error: {message}")]
    #[diagnostic(code(shipnote::release::config), help("{help}"))]
    Config {
        /// The error message
        message: String,
        /// Help text for the user
        help: String,
    },

    /// A collaborator (tag listing, hosting API, ...) failed.
    #[error("{collaborator} error: {message}")]
    #[diagnostic(code(shipnote::release::collaborator))]
    Collaborator {
        /// Name of the failing collaborator
        collaborator: String,
        /// The error message
        message: String,
    },
}

impl Error {
    /// Create a new invalid version error.
    #[must_use]
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    /// Create a new version overflow error.
    #[must_use]
    pub fn version_overflow(version: impl Into<String>, bump: BumpType) -> Self {
        Self::VersionOverflow {
            version: version.into(),
            bump,
        }
    }

    /// Create a new invalid bump configuration error.
    #[must_use]
    pub fn invalid_bump(value: impl Into<String>) -> Self {
        Self::InvalidBumpConfiguration {
            value: value.into(),
        }
    }

    /// Create a new document parse error.
    #[must_use]
    pub fn document_parse(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::DocumentParse {
            message: message.into(),
            line,
        }
    }

    /// Create a new changelog I/O error with source.
    #[must_use]
    pub fn changelog_io_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::ChangelogIo {
            message: message.into(),
            path,
            source,
        }
    }

    /// Create a new invalid date error.
    #[must_use]
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.into(),
        }
    }

    /// Create a new collaborator error.
    #[must_use]
    pub fn collaborator(collaborator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator: collaborator.into(),
            message: message.into(),
        }
    }

    /// Whether this error indicates a broken invocation rather than messy input.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidBumpConfiguration { .. } | Self::Config { .. } | Self::InvalidDate { .. }
        )
    }
}
