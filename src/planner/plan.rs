//! Ordered collection of changes produced by one reconciliation run.
//!
//! A plan is append-only while a comparator builds it and read-only once it is
//! handed back. All combinators return new plans and leave their operands
//! untouched.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::change::{Category, Change, ChangeType};

/// An ordered sequence of [`Change`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    changes: Vec<Change>,
}

/// Number of changes per [`ChangeType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeCounts {
    /// Number of `Add` changes.
    pub add: usize,
    /// Number of `Update` changes.
    pub update: usize,
    /// Number of `Delete` changes.
    pub delete: usize,
    /// Number of `Missing` changes.
    pub missing: usize,
}

impl Plan {
    /// Creates an empty plan.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Appends a change.
    pub fn add(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Appends every change from `changes`, preserving their order.
    pub fn add_all(&mut self, changes: impl IntoIterator<Item = Change>) {
        self.changes.extend(changes);
    }

    /// Returns a new plan holding `self` followed by `other`.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut changes = Vec::with_capacity(self.changes.len() + other.changes.len());
        changes.extend_from_slice(&self.changes);
        changes.extend_from_slice(&other.changes);
        Self { changes }
    }

    /// Returns a new plan with the changes matching `predicate`, in order.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&Change) -> bool) -> Self {
        self.changes.iter().filter(|c| predicate(c)).cloned().collect()
    }

    /// Returns the changes belonging to `category`.
    #[must_use]
    pub fn filter_by_category(&self, category: Category) -> Self {
        self.filter(|c| c.category() == category)
    }

    /// Returns the changes of kind `change_type`.
    #[must_use]
    pub fn filter_by_type(&self, change_type: ChangeType) -> Self {
        self.filter(|c| c.change_type() == change_type)
    }

    /// Returns the plan that would undo this one, element by element.
    #[must_use]
    pub fn invert(&self) -> Self {
        self.changes.iter().map(Change::invert).collect()
    }

    /// Counts changes per type.
    #[must_use]
    pub fn count_by_type(&self) -> ChangeCounts {
        let mut counts = ChangeCounts::default();
        for change in &self.changes {
            match change.change_type() {
                ChangeType::Add => counts.add += 1,
                ChangeType::Update => counts.update += 1,
                ChangeType::Delete => counts.delete += 1,
                ChangeType::Missing => counts.missing += 1,
            }
        }
        counts
    }

    /// Counts changes per category. Categories without changes are absent.
    #[must_use]
    pub fn count_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for change in &self.changes {
            *counts.entry(change.category()).or_insert(0) += 1;
        }
        counts
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for change in &self.changes {
            if !seen.contains(&change.category()) {
                seen.push(change.category());
            }
        }
        seen
    }

    /// Returns true if any change deletes something.
    #[must_use]
    pub fn has_deletes(&self) -> bool {
        self.changes
            .iter()
            .any(|c| c.change_type() == ChangeType::Delete)
    }

    /// Returns true if any secret could not be resolved.
    #[must_use]
    pub fn has_missing_secrets(&self) -> bool {
        self.has_missing_in(Category::Secrets)
    }

    /// Returns true if any variable could not be resolved.
    #[must_use]
    pub fn has_missing_variables(&self) -> bool {
        self.has_missing_in(Category::Variables)
    }

    fn has_missing_in(&self, category: Category) -> bool {
        self.changes
            .iter()
            .any(|c| c.change_type() == ChangeType::Missing && c.category() == category)
    }

    /// Number of changes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.changes.len()
    }

    /// Returns true if the plan has no changes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Changes in insertion order.
    #[must_use]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Iterates over the changes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }
}

impl ChangeCounts {
    /// Sum of all counts.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.add + self.update + self.delete + self.missing
    }
}

impl FromIterator<Change> for Plan {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Plan {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changes.is_empty() {
            return write!(f, "No changes");
        }

        for category in self.categories() {
            writeln!(f, "{category}:")?;
            for change in self.changes.iter().filter(|c| c.category() == category) {
                writeln!(f, "  {change}")?;
            }
        }
        Ok(())
    }
}
