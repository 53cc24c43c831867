//! Collaborator seams.
//!
//! The engine performs no I/O of its own. Tag listing and changelog storage
//! are provided by implementations of [`TagSource`] and [`ChangelogStore`].

use crate::config::ChangelogConfig;
use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Lists repository tags, most recent first.
pub trait TagSource {
    /// Return all tags, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the tags cannot be listed.
    fn list_tags(&self) -> Result<Vec<String>>;
}

/// Reads and writes the changelog document.
pub trait ChangelogStore {
    /// Read the changelog text, or `None` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the changelog exists but cannot be read.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the changelog text.
    ///
    /// # Errors
    ///
    /// Returns an error if the changelog cannot be written.
    fn write(&self, content: &str) -> Result<()>;
}

/// A fixed list of tags.
#[derive(Debug, Clone, Default)]
pub struct StaticTags(pub Vec<String>);

impl TagSource for StaticTags {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Tags read from a local git checkout with `git tag`.
///
/// Tags are sorted by creation date, newest first.
#[derive(Debug, Clone)]
pub struct GitTagSource {
    repo: PathBuf,
}

impl GitTagSource {
    /// Create a tag source for the repository at `repo`.
    #[must_use]
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }
}

impl TagSource for GitTagSource {
    fn list_tags(&self) -> Result<Vec<String>> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo)
            .args(["tag", "--list", "--sort=-creatordate"])
            .output()
            .map_err(|e| Error::collaborator("git", format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::collaborator(
                "git",
                format!("git tag failed: {}", stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let tags: Vec<String> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        debug!(repo = %self.repo.display(), count = tags.len(), "Listed git tags");
        Ok(tags)
    }
}

/// Changelog stored on the local file system.
#[derive(Debug, Clone)]
pub struct FileChangelogStore {
    path: PathBuf,
}

impl FileChangelogStore {
    /// Create a store for the changelog at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for `relative` under `root`.
    #[must_use]
    pub fn in_root(root: &Path, relative: &str) -> Self {
        Self::new(root.join(relative))
    }

    /// Create a store for the configured changelog path under `root`.
    #[must_use]
    pub fn from_config(root: &Path, config: &ChangelogConfig) -> Self {
        Self::in_root(root, &config.path)
    }

    /// Path of the changelog file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChangelogStore for FileChangelogStore {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Changelog does not exist yet");
                Ok(None)
            }
            Err(e) => Err(Error::changelog_io_with_source(
                format!("Failed to read changelog: {}", self.path.display()),
                Some(self.path.clone()),
                e,
            )),
        }
    }

    fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                Error::changelog_io_with_source(
                    format!("Failed to create directory: {}", parent.display()),
                    Some(parent.to_path_buf()),
                    e,
                )
            })?;
        }

        fs::write(&self.path, content).map_err(|e| {
            Error::changelog_io_with_source(
                format!("Failed to write changelog: {}", self.path.display()),
                Some(self.path.clone()),
                e,
            )
        })
    }
}

/// In-memory changelog, mainly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryChangelogStore {
    content: RefCell<Option<String>>,
}

impl MemoryChangelogStore {
    /// A store holding `content`.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: RefCell::new(Some(content.into())),
        }
    }

    /// A store with no changelog yet.
    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }

    /// Current content.
    #[must_use]
    pub fn content(&self) -> Option<String> {
        self.content.borrow().clone()
    }
}

impl ChangelogStore for MemoryChangelogStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.content())
    }

    fn write(&self, content: &str) -> Result<()> {
        *self.content.borrow_mut() = Some(content.to_string());
        Ok(())
    }
}
