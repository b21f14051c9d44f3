//! Actions permissions.

use crate::config::{ActionsConfig, SelectedActionsConfig};
use crate::planner::change::{Category, Change};

use super::{diff_field, sequences_equal};

/// Repository-level Actions policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentActionsPermissions {
    /// Actions enabled.
    pub enabled: bool,
    /// `all`, `local_only` or `selected`.
    pub allowed_actions: String,
}

/// Allow-list detail for the `selected` mode. The default value stands for
/// "nothing configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentSelectedActions {
    /// Actions created by GitHub allowed.
    pub github_owned_allowed: bool,
    /// Actions from verified creators allowed.
    pub verified_allowed: bool,
    /// Allowed patterns, in API order.
    pub patterns_allowed: Vec<String>,
}

/// Default `GITHUB_TOKEN` permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentWorkflowPermissions {
    /// `read` or `write`.
    pub default_workflow_permissions: String,
    /// Workflows may approve pull requests.
    pub can_approve_pull_request_reviews: bool,
}

/// Compares the enabled flag and the allowed-actions mode.
#[must_use]
pub fn compare_actions_permissions(
    current: &CurrentActionsPermissions,
    desired: &ActionsConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    diff_field(
        &mut changes,
        Category::Actions,
        "enabled",
        &current.enabled,
        desired.enabled.as_ref(),
    );
    diff_field(
        &mut changes,
        Category::Actions,
        "allowed_actions",
        &current.allowed_actions,
        desired.allowed_actions.as_ref(),
    );
    changes
}

/// Compares the selected-actions allow-list. Patterns are compared in order.
#[must_use]
pub fn compare_selected_actions(
    current: &CurrentSelectedActions,
    desired: &SelectedActionsConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    diff_field(
        &mut changes,
        Category::Actions,
        "github_owned_allowed",
        &current.github_owned_allowed,
        desired.github_owned_allowed.as_ref(),
    );
    diff_field(
        &mut changes,
        Category::Actions,
        "verified_allowed",
        &current.verified_allowed,
        desired.verified_allowed.as_ref(),
    );

    if let Some(patterns) = desired.patterns_allowed.as_deref()
        && !sequences_equal(&current.patterns_allowed, patterns)
    {
        changes.push(Change::update(
            Category::Actions,
            "patterns_allowed",
            current.patterns_allowed.clone(),
            patterns.to_vec(),
        ));
    }

    changes
}

/// Compares default workflow permissions.
#[must_use]
pub fn compare_workflow_permissions(
    current: &CurrentWorkflowPermissions,
    desired: &ActionsConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    diff_field(
        &mut changes,
        Category::Actions,
        "default_workflow_permissions",
        &current.default_workflow_permissions,
        desired.default_workflow_permissions.as_ref(),
    );
    diff_field(
        &mut changes,
        Category::Actions,
        "can_approve_pull_request_reviews",
        &current.can_approve_pull_request_reviews,
        desired.can_approve_pull_request_reviews.as_ref(),
    );
    changes
}
