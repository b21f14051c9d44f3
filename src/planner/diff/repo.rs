//! Repository settings and topics.

use std::collections::HashSet;

use crate::config::SettingsConfig;
use crate::planner::change::{Category, Change};

use super::diff_field;

/// Current repository settings, normalized from the API response.
///
/// `description` and `homepage` are empty strings when the API returned
/// `null` or omitted them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentRepo {
    /// Short description.
    pub description: String,
    /// Homepage URL.
    pub homepage: String,
    /// Visibility (`public`, `private`, `internal`).
    pub visibility: String,
    /// Merge commits allowed.
    pub allow_merge_commit: bool,
    /// Squash merging allowed.
    pub allow_squash_merge: bool,
    /// Rebase merging allowed.
    pub allow_rebase_merge: bool,
    /// Auto-merge allowed.
    pub allow_auto_merge: bool,
    /// Head branches deleted after merge.
    pub delete_branch_on_merge: bool,
    /// Branch update suggestions enabled.
    pub allow_update_branch: bool,
    /// Topics in API order.
    pub topics: Vec<String>,
}

/// Compares scalar repository settings field by field.
///
/// Each differing field yields one `Update` keyed by the field name.
#[must_use]
pub fn compare_repo_settings(current: &CurrentRepo, desired: &SettingsConfig) -> Vec<Change> {
    let mut changes = Vec::new();
    let c = Category::Repo;

    diff_field(&mut changes, c, "description", &current.description, desired.description.as_ref());
    diff_field(&mut changes, c, "homepage", &current.homepage, desired.homepage.as_ref());
    diff_field(&mut changes, c, "visibility", &current.visibility, desired.visibility.as_ref());
    diff_field(
        &mut changes,
        c,
        "allow_merge_commit",
        &current.allow_merge_commit,
        desired.allow_merge_commit.as_ref(),
    );
    diff_field(
        &mut changes,
        c,
        "allow_squash_merge",
        &current.allow_squash_merge,
        desired.allow_squash_merge.as_ref(),
    );
    diff_field(
        &mut changes,
        c,
        "allow_rebase_merge",
        &current.allow_rebase_merge,
        desired.allow_rebase_merge.as_ref(),
    );
    diff_field(
        &mut changes,
        c,
        "allow_auto_merge",
        &current.allow_auto_merge,
        desired.allow_auto_merge.as_ref(),
    );
    diff_field(
        &mut changes,
        c,
        "delete_branch_on_merge",
        &current.delete_branch_on_merge,
        desired.delete_branch_on_merge.as_ref(),
    );
    diff_field(
        &mut changes,
        c,
        "allow_update_branch",
        &current.allow_update_branch,
        desired.allow_update_branch.as_ref(),
    );

    changes
}

/// Set equality: order and repeated entries are ignored.
#[must_use]
pub fn topics_equal(current: &[String], desired: &[String]) -> bool {
    let current: HashSet<&str> = current.iter().map(String::as_str).collect();
    let desired: HashSet<&str> = desired.iter().map(String::as_str).collect();
    current == desired
}

/// Compares the topic list as a whole. Any difference yields a single
/// `Update` carrying both full lists.
#[must_use]
pub fn compare_topics(current: &[String], desired: Option<&[String]>) -> Vec<Change> {
    match desired {
        Some(desired) if !topics_equal(current, desired) => vec![Change::update(
            Category::Topics,
            "topics",
            current.to_vec(),
            desired.to_vec(),
        )],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::change::{ChangeType, ChangeValue};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn current() -> CurrentRepo {
        CurrentRepo {
            description: String::from("A widget"),
            visibility: String::from("public"),
            allow_merge_commit: true,
            allow_squash_merge: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_unspecified_fields_are_ignored() {
        let changes = compare_repo_settings(&current(), &SettingsConfig::default());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_explicit_empty_and_false_are_compared() {
        let desired = SettingsConfig {
            description: Some(String::new()),
            allow_merge_commit: Some(false),
            ..Default::default()
        };

        let changes = compare_repo_settings(&current(), &desired);

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].key(), "description");
        assert_eq!(changes[0].old(), Some(&ChangeValue::from("A widget")));
        assert_eq!(changes[0].new_value(), Some(&ChangeValue::from("")));
        assert_eq!(changes[1].key(), "allow_merge_commit");
        assert_eq!(changes[1].new_value(), Some(&ChangeValue::Bool(false)));
    }

    #[test]
    fn test_field_order() {
        let desired = SettingsConfig {
            allow_update_branch: Some(true),
            homepage: Some(String::from("https://widget.dev")),
            visibility: Some(String::from("private")),
            ..Default::default()
        };

        let keys: Vec<String> = compare_repo_settings(&current(), &desired)
            .iter()
            .map(|c| c.key().to_string())
            .collect();

        assert_eq!(keys, strings(&["homepage", "visibility", "allow_update_branch"]));
    }

    #[test]
    fn test_equal_values_produce_nothing() {
        let desired = SettingsConfig {
            description: Some(String::from("A widget")),
            allow_squash_merge: Some(true),
            ..Default::default()
        };
        assert!(compare_repo_settings(&current(), &desired).is_empty());
    }

    #[test]
    fn test_topics_order_insensitive() {
        let current = strings(&["a", "b"]);
        let desired = strings(&["b", "a"]);
        assert!(compare_topics(&current, Some(desired.as_slice())).is_empty());

        let desired = strings(&["b", "a", "a"]);
        assert!(compare_topics(&current, Some(desired.as_slice())).is_empty());
    }

    #[test]
    fn test_topics_difference_single_update() {
        let current = strings(&["a"]);
        let desired = strings(&["a", "b", "c"]);

        let changes = compare_topics(&current, Some(desired.as_slice()));

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type(), ChangeType::Update);
        assert_eq!(changes[0].category(), Category::Topics);
        assert_eq!(changes[0].new_value(), Some(&ChangeValue::List(desired)));
    }

    #[test]
    fn test_topics_unmanaged() {
        assert!(compare_topics(&strings(&["a"]), None).is_empty());
    }

    #[test]
    fn test_topics_cleared() {
        let changes = compare_topics(&strings(&["a"]), Some(&[][..]));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].new_value(), Some(&ChangeValue::List(vec![])));
    }
}
