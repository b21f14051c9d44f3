//! Branch protection rules.

use crate::config::BranchProtectionConfig;
use crate::planner::change::{Category, Change};

use super::{diff_field, sequences_equal};

/// Protection currently applied to a branch. Sections the API omitted are
/// defaulted (zero reviews, flags off, no contexts).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentBranchProtection {
    /// Required approving review count.
    pub required_reviews: u32,
    /// Stale approvals dismissed on push.
    pub dismiss_stale_reviews: bool,
    /// Code owner review required.
    pub require_code_owner_reviews: bool,
    /// Branch must be up to date before merging.
    pub require_status_checks: bool,
    /// Rule applies to administrators.
    pub enforce_admins: bool,
    /// Linear history required.
    pub require_linear_history: bool,
    /// Force pushes permitted.
    pub allow_force_pushes: bool,
    /// Deletion permitted.
    pub allow_deletions: bool,
    /// Required status check contexts, in API order.
    pub status_checks: Vec<String>,
}

/// Ordered comparison of status check contexts.
///
/// An unmanaged desired list (`None`) always matches. An absent current list
/// is the same as an empty one.
#[must_use]
pub fn status_checks_equal(current: Option<&[String]>, desired: Option<&[String]>) -> bool {
    desired.is_none_or(|desired| sequences_equal(current.unwrap_or_default(), desired))
}

/// One-line summary of a rule that does not exist yet.
#[must_use]
pub fn summarize_branch_protection(desired: &BranchProtectionConfig) -> String {
    let mut parts = Vec::new();

    if let Some(n) = desired.required_reviews {
        parts.push(format!("required_reviews={n}"));
    }
    let flags = [
        ("dismiss_stale_reviews", desired.dismiss_stale_reviews),
        ("require_code_owner_reviews", desired.require_code_owner_reviews),
        ("require_status_checks", desired.require_status_checks),
        ("enforce_admins", desired.enforce_admins),
        ("require_linear_history", desired.require_linear_history),
        ("allow_force_pushes", desired.allow_force_pushes),
        ("allow_deletions", desired.allow_deletions),
    ];
    for (name, value) in flags {
        if let Some(value) = value {
            parts.push(format!("{name}={value}"));
        }
    }
    if let Some(checks) = &desired.status_checks {
        parts.push(format!("status_checks=[{}]", checks.join(", ")));
    }

    if parts.is_empty() {
        String::from("protection with default settings")
    } else {
        parts.join(", ")
    }
}

/// Compares the rule on `branch` field by field.
///
/// Keys are prefixed with `<branch>.`. Status check contexts are compared in
/// order, unlike topics.
#[must_use]
pub fn compare_branch_protection(
    branch: &str,
    current: &CurrentBranchProtection,
    desired: &BranchProtectionConfig,
) -> Vec<Change> {
    let mut changes = Vec::new();
    let c = Category::BranchProtection;
    let key = |field: &str| format!("{branch}.{field}");

    diff_field(
        &mut changes,
        c,
        key("required_reviews"),
        &current.required_reviews,
        desired.required_reviews.as_ref(),
    );

    let flags = [
        ("dismiss_stale_reviews", current.dismiss_stale_reviews, desired.dismiss_stale_reviews),
        (
            "require_code_owner_reviews",
            current.require_code_owner_reviews,
            desired.require_code_owner_reviews,
        ),
        ("require_status_checks", current.require_status_checks, desired.require_status_checks),
        ("enforce_admins", current.enforce_admins, desired.enforce_admins),
        ("require_linear_history", current.require_linear_history, desired.require_linear_history),
        ("allow_force_pushes", current.allow_force_pushes, desired.allow_force_pushes),
        ("allow_deletions", current.allow_deletions, desired.allow_deletions),
    ];
    for (field, current_value, desired_value) in flags {
        diff_field(&mut changes, c, key(field), &current_value, desired_value.as_ref());
    }

    if let Some(desired_checks) = desired.status_checks.as_deref()
        && !status_checks_equal(Some(current.status_checks.as_slice()), Some(desired_checks))
    {
        changes.push(Change::update(
            c,
            key("status_checks"),
            current.status_checks.clone(),
            desired_checks.to_vec(),
        ));
    }

    changes
}
