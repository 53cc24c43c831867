//! Change categories and the category-keyed [`ChangeSet`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six fixed Keep a Changelog sections.
///
/// Variant order is the canonical rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChangeCategory {
    /// New features.
    Added,
    /// Changes in existing functionality.
    Changed,
    /// Soon-to-be removed features.
    Deprecated,
    /// Removed features.
    Removed,
    /// Bug fixes.
    Fixed,
    /// Vulnerability fixes.
    Security,
}

impl ChangeCategory {
    /// All categories in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Added,
        Self::Changed,
        Self::Deprecated,
        Self::Removed,
        Self::Fixed,
        Self::Security,
    ];

    /// Section heading name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Deprecated => "Deprecated",
            Self::Removed => "Removed",
            Self::Fixed => "Fixed",
            Self::Security => "Security",
        }
    }

    /// Case-insensitive lookup by section name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(name))
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChangeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown change category: {s}"))
    }
}

/// Ordered change entries for every category.
///
/// All six categories are always present (possibly empty) and iteration is
/// always in canonical order, independent of insertion history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    entries: [Vec<String>; 6],
}

impl ChangeSet {
    /// Create a change set with every category empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items recorded for a category, in insertion order.
    #[must_use]
    pub fn get(&self, category: ChangeCategory) -> &[String] {
        &self.entries[category.index()]
    }

    /// Append an item to a category.
    pub fn push(&mut self, category: ChangeCategory, item: impl Into<String>) {
        self.entries[category.index()].push(item.into());
    }

    /// Builder-style [`ChangeSet::push`].
    #[must_use]
    pub fn with(mut self, category: ChangeCategory, item: impl Into<String>) -> Self {
        self.push(category, item);
        self
    }

    /// Mutable access to the last item of a category.
    pub fn last_mut(&mut self, category: ChangeCategory) -> Option<&mut String> {
        self.entries[category.index()].last_mut()
    }

    /// Concatenate every category of `other` onto this set, preserving order.
    ///
    /// Never overwrites and never deduplicates.
    pub fn extend_from(&mut self, other: &Self) {
        for (category, items) in other.iter() {
            self.entries[category.index()].extend(items.iter().cloned());
        }
    }

    /// Iterate `(category, items)` pairs in canonical order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (ChangeCategory, &[String])> {
        ChangeCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Iterate only the categories that hold at least one item.
    pub fn non_empty(&self) -> impl Iterator<Item = (ChangeCategory, &[String])> {
        self.iter().filter(|(_, items)| !items.is_empty())
    }

    /// Whether no category holds any item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Vec::is_empty)
    }

    /// Total number of items across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_name() {
        assert_eq!(ChangeCategory::from_name("added"), Some(ChangeCategory::Added));
        assert_eq!(
            ChangeCategory::from_name(" SECURITY "),
            Some(ChangeCategory::Security)
        );
        assert_eq!(ChangeCategory::from_name("Breaking"), None);
        assert!("Fixed".parse::<ChangeCategory>().is_ok());
    }

    #[test]
    fn test_canonical_order() {
        let names: Vec<_> = ChangeCategory::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            ["Added", "Changed", "Deprecated", "Removed", "Fixed", "Security"]
        );
    }

    #[test]
    fn test_new_change_set_is_empty() {
        let set = ChangeSet::new();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 6);
        assert_eq!(set.non_empty().count(), 0);
    }

    #[test]
    fn test_iteration_ignores_insertion_order() {
        let set = ChangeSet::new()
            .with(ChangeCategory::Security, "patch CVE")
            .with(ChangeCategory::Added, "new flag");
        let order: Vec<_> = set.non_empty().map(|(c, _)| c).collect();
        assert_eq!(order, [ChangeCategory::Added, ChangeCategory::Security]);
    }

    #[test]
    fn test_extend_from_concatenates() {
        let mut base = ChangeSet::new().with(ChangeCategory::Fixed, "a");
        let other = ChangeSet::new()
            .with(ChangeCategory::Fixed, "a")
            .with(ChangeCategory::Fixed, "b");
        base.extend_from(&other);
        assert_eq!(base.get(ChangeCategory::Fixed), ["a", "a", "b"]);
        assert_eq!(base.len(), 3);
    }
}
