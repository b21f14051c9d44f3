//! Pure comparison services.
//!
//! Each function takes a *current* snapshot (concrete values, defaulted where
//! the API omitted them) and a *desired* section of the configuration
//! (optional values), and returns the changes needed to go from one to the
//! other. Nothing here performs I/O.
//!
//! A desired value of `None` means the field is not managed: no change is
//! emitted for it whatever the current value is. Any `Some` value, including
//! an empty string, `false` or `0`, is compared.

mod actions;
mod branch_protection;
mod env;
mod labels;
mod pages;
mod repo;

pub use actions::{
    CurrentActionsPermissions, CurrentSelectedActions, CurrentWorkflowPermissions,
    compare_actions_permissions, compare_selected_actions, compare_workflow_permissions,
};
pub use branch_protection::{
    CurrentBranchProtection, compare_branch_protection, status_checks_equal,
    summarize_branch_protection,
};
pub use env::{CurrentVariable, compare_secrets, compare_variables};
pub use labels::{CurrentLabel, compare_labels, format_label};
pub use pages::{CurrentPages, CurrentPagesSource, compare_pages, summarize_pages};
pub use repo::{CurrentRepo, compare_repo_settings, compare_topics, topics_equal};

use super::change::{Category, Change, ChangeValue};

/// Pushes an `Update` when `desired` is specified and differs from `current`.
fn diff_field<T>(
    changes: &mut Vec<Change>,
    category: Category,
    key: impl Into<String>,
    current: &T,
    desired: Option<&T>,
) where
    T: PartialEq + Clone + Into<ChangeValue>,
{
    if let Some(desired) = desired
        && desired != current
    {
        changes.push(Change::update(
            category,
            key,
            current.clone(),
            desired.clone(),
        ));
    }
}

/// Ordered comparison. Callers map an absent current sequence to an empty
/// one, so `nil` and `[]` compare equal.
fn sequences_equal(current: &[String], desired: &[String]) -> bool {
    current == desired
}
