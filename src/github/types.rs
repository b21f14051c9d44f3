//! GitHub REST API response types.
//!
//! These mirror the JSON payloads closely. Sections and flags the API may
//! leave out are defaulted so a partially populated response still decodes.

use serde::{Deserialize, Serialize};

use super::nullable::Nullable;

/// `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    /// `owner/name`.
    #[serde(default)]
    pub full_name: String,
    /// Description, `null` when unset.
    #[serde(default)]
    pub description: Nullable<String>,
    /// Homepage, `null` when unset.
    #[serde(default)]
    pub homepage: Nullable<String>,
    /// Visibility.
    #[serde(default)]
    pub visibility: Option<String>,
    /// Legacy private flag, used when `visibility` is absent.
    #[serde(default)]
    pub private: bool,
    /// Merge commits allowed.
    #[serde(default)]
    pub allow_merge_commit: bool,
    /// Squash merging allowed.
    #[serde(default)]
    pub allow_squash_merge: bool,
    /// Rebase merging allowed.
    #[serde(default)]
    pub allow_rebase_merge: bool,
    /// Auto-merge allowed.
    #[serde(default)]
    pub allow_auto_merge: bool,
    /// Head branches deleted after merge.
    #[serde(default)]
    pub delete_branch_on_merge: bool,
    /// Branch update suggestions enabled.
    #[serde(default)]
    pub allow_update_branch: bool,
    /// Topics.
    #[serde(default)]
    pub topics: Vec<String>,
}

/// `GET /repos/{owner}/{repo}/branches/{branch}/protection`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchProtection {
    /// Status check requirements.
    #[serde(default)]
    pub required_status_checks: Option<RequiredStatusChecks>,
    /// Admin enforcement.
    #[serde(default)]
    pub enforce_admins: Option<EnabledFlag>,
    /// Pull request review requirements.
    #[serde(default)]
    pub required_pull_request_reviews: Option<RequiredPullRequestReviews>,
    /// Linear history requirement.
    #[serde(default)]
    pub required_linear_history: Option<EnabledFlag>,
    /// Force push permission.
    #[serde(default)]
    pub allow_force_pushes: Option<EnabledFlag>,
    /// Deletion permission.
    #[serde(default)]
    pub allow_deletions: Option<EnabledFlag>,
}

/// Status check section of a protection rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequiredStatusChecks {
    /// Branch must be up to date.
    #[serde(default)]
    pub strict: bool,
    /// Required contexts.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
}

/// Review section of a protection rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequiredPullRequestReviews {
    /// Stale approvals dismissed.
    #[serde(default)]
    pub dismiss_stale_reviews: bool,
    /// Code owner review required.
    #[serde(default)]
    pub require_code_owner_reviews: bool,
    /// Approvals required.
    #[serde(default)]
    pub required_approving_review_count: u32,
}

/// `{ "enabled": bool }` wrapper used by several protection settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EnabledFlag {
    /// Setting state.
    #[serde(default)]
    pub enabled: bool,
}

/// An issue label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Hex color without `#`.
    #[serde(default)]
    pub color: String,
    /// Description, `null` when unset.
    #[serde(default)]
    pub description: Nullable<String>,
}

/// `GET /repos/{owner}/{repo}/actions/secrets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretList {
    /// Total number of secrets.
    #[serde(default)]
    pub total_count: usize,
    /// Secret metadata (names only).
    #[serde(default)]
    pub secrets: Vec<SecretEntry>,
}

/// Secret metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretEntry {
    /// Secret name.
    pub name: String,
}

/// `GET /repos/{owner}/{repo}/actions/variables`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableList {
    /// Total number of variables.
    #[serde(default)]
    pub total_count: usize,
    /// Variables.
    #[serde(default)]
    pub variables: Vec<Variable>,
}

/// An Actions variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name.
    pub name: String,
    /// Variable value.
    #[serde(default)]
    pub value: String,
}

/// `GET /repos/{owner}/{repo}/actions/permissions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionsPermissions {
    /// Actions enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Allowed-actions mode; absent when Actions is disabled.
    #[serde(default)]
    pub allowed_actions: Option<String>,
}

/// `GET /repos/{owner}/{repo}/actions/permissions/selected-actions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectedActions {
    /// Actions created by GitHub allowed.
    #[serde(default)]
    pub github_owned_allowed: bool,
    /// Verified creators allowed.
    #[serde(default)]
    pub verified_allowed: bool,
    /// Allowed patterns.
    #[serde(default)]
    pub patterns_allowed: Vec<String>,
}

/// `GET /repos/{owner}/{repo}/actions/permissions/workflow`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowPermissions {
    /// `read` or `write`.
    #[serde(default)]
    pub default_workflow_permissions: String,
    /// Workflows may approve pull requests.
    #[serde(default)]
    pub can_approve_pull_request_reviews: bool,
}

/// `GET /repos/{owner}/{repo}/pages`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pages {
    /// `workflow` or `legacy`, `null` on old sites.
    #[serde(default)]
    pub build_type: Nullable<String>,
    /// Publishing source.
    #[serde(default)]
    pub source: Option<PagesSource>,
}

/// Pages publishing source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagesSource {
    /// Source branch.
    #[serde(default)]
    pub branch: String,
    /// Source directory.
    #[serde(default)]
    pub path: String,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

impl Repository {
    /// Visibility, falling back to the legacy `private` flag.
    #[must_use]
    pub fn effective_visibility(&self) -> String {
        self.visibility.clone().unwrap_or_else(|| {
            if self.private {
                String::from("private")
            } else {
                String::from("public")
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_protection_decodes() {
        let json = r#"{
            "required_pull_request_reviews": {"required_approving_review_count": 2},
            "enforce_admins": {"url": "https://x", "enabled": true}
        }"#;

        let protection: BranchProtection =
            serde_json::from_str(json).expect("protection should decode");

        assert_eq!(
            protection
                .required_pull_request_reviews
                .map(|r| r.required_approving_review_count),
            Some(2)
        );
        assert!(protection.enforce_admins.is_some_and(|f| f.enabled));
        assert!(protection.required_status_checks.is_none());
    }

    #[test]
    fn test_repository_visibility_fallback() {
        let repo: Repository =
            serde_json::from_str(r#"{"private": true, "description": null}"#).expect("decode");
        assert_eq!(repo.effective_visibility(), "private");
        assert!(repo.description.is_null());
        assert!(repo.homepage.is_unspecified());
    }
}
