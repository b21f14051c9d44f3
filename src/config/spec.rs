//! Desired-state configuration types.
//!
//! This module defines the structs that map to the `repo-settings.yaml` file.
//! Every leaf is optional: a field left out of the file is not managed and is
//! never compared against the live repository. A field given an empty or
//! false value *is* managed and will be diffed like any other value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DesiredState {
    /// Repository being reconciled.
    pub repository: RepositoryConfig,
    /// Repository scalar settings and topics.
    #[serde(default)]
    pub settings: Option<SettingsConfig>,
    /// Issue labels.
    #[serde(default)]
    pub labels: Option<LabelsConfig>,
    /// Branch protection rules keyed by branch name.
    #[serde(default)]
    pub branch_protection: BTreeMap<String, BranchProtectionConfig>,
    /// Actions secrets and variables.
    #[serde(default)]
    pub env: Option<EnvConfig>,
    /// Actions permissions.
    #[serde(default)]
    pub actions: Option<ActionsConfig>,
    /// GitHub Pages site.
    #[serde(default)]
    pub pages: Option<PagesConfig>,
}

/// Repository coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

/// Repository scalar settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsConfig {
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,
    /// `public`, `private` or `internal`.
    #[serde(default)]
    pub visibility: Option<String>,
    /// Allow merge commits.
    #[serde(default)]
    pub allow_merge_commit: Option<bool>,
    /// Allow squash merging.
    #[serde(default)]
    pub allow_squash_merge: Option<bool>,
    /// Allow rebase merging.
    #[serde(default)]
    pub allow_rebase_merge: Option<bool>,
    /// Allow auto-merge.
    #[serde(default)]
    pub allow_auto_merge: Option<bool>,
    /// Delete head branches after merge.
    #[serde(default)]
    pub delete_branch_on_merge: Option<bool>,
    /// Suggest updating pull request branches.
    #[serde(default)]
    pub allow_update_branch: Option<bool>,
    /// Repository topics. Compared as a set.
    #[serde(default)]
    pub topics: Option<Vec<String>>,
}

/// Label section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelsConfig {
    /// Delete labels that exist on the repository but are not declared here.
    #[serde(default)]
    pub replace_default: bool,
    /// Declared labels.
    #[serde(default)]
    pub items: Vec<LabelConfig>,
}

/// A single declared label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelConfig {
    /// Label name.
    pub name: String,
    /// Hex color without the leading `#`.
    pub color: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Protection rule for one branch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchProtectionConfig {
    /// Required approving review count.
    #[serde(default)]
    pub required_reviews: Option<u32>,
    /// Dismiss stale approvals on new commits.
    #[serde(default)]
    pub dismiss_stale_reviews: Option<bool>,
    /// Require review from code owners.
    #[serde(default)]
    pub require_code_owner_reviews: Option<bool>,
    /// Require branches to be up to date before merging.
    #[serde(default)]
    pub require_status_checks: Option<bool>,
    /// Required status check contexts, compared in order.
    #[serde(default)]
    pub status_checks: Option<Vec<String>>,
    /// Apply the rule to administrators.
    #[serde(default)]
    pub enforce_admins: Option<bool>,
    /// Require linear history.
    #[serde(default)]
    pub require_linear_history: Option<bool>,
    /// Permit force pushes.
    #[serde(default)]
    pub allow_force_pushes: Option<bool>,
    /// Permit branch deletion.
    #[serde(default)]
    pub allow_deletions: Option<bool>,
}

/// Actions secrets and variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvConfig {
    /// Secret names. Values come from the local override file.
    #[serde(default)]
    pub secrets: Vec<String>,
    /// Variables with their default values.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

/// Actions permissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionsConfig {
    /// Actions enabled for the repository.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// `all`, `local_only` or `selected`.
    #[serde(default)]
    pub allowed_actions: Option<String>,
    /// Detail for the `selected` mode.
    #[serde(default)]
    pub selected_actions: Option<SelectedActionsConfig>,
    /// `read` or `write`.
    #[serde(default)]
    pub default_workflow_permissions: Option<String>,
    /// Whether workflows may approve pull requests.
    #[serde(default)]
    pub can_approve_pull_request_reviews: Option<bool>,
}

/// Allow-list used when `allowed_actions` is `selected`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedActionsConfig {
    /// Allow actions created by GitHub.
    #[serde(default)]
    pub github_owned_allowed: Option<bool>,
    /// Allow actions from verified creators.
    #[serde(default)]
    pub verified_allowed: Option<bool>,
    /// Allowed action patterns, compared in order.
    #[serde(default)]
    pub patterns_allowed: Option<Vec<String>>,
}

/// GitHub Pages site.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagesConfig {
    /// `workflow` or `legacy`.
    #[serde(default)]
    pub build_type: Option<String>,
    /// Publishing source for `legacy` builds.
    #[serde(default)]
    pub source: Option<PagesSourceConfig>,
}

/// Pages publishing source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagesSourceConfig {
    /// Source branch.
    #[serde(default)]
    pub branch: Option<String>,
    /// Source directory (`/` or `/docs`).
    #[serde(default)]
    pub path: Option<String>,
}

/// Build type assumed when Pages must be created and none is declared.
pub const DEFAULT_PAGES_BUILD_TYPE: &str = "workflow";

impl DesiredState {
    /// Returns `owner/name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.repository.owner, self.repository.name)
    }

    /// Total number of managed items, used for log output.
    #[must_use]
    pub fn managed_item_count(&self) -> usize {
        let labels = self.labels.as_ref().map_or(0, |l| l.items.len());
        let env = self
            .env
            .as_ref()
            .map_or(0, |e| e.secrets.len() + e.variables.len());
        labels + env + self.branch_protection.len()
    }
}

impl PagesConfig {
    /// Declared build type, or the default used on creation.
    #[must_use]
    pub fn effective_build_type(&self) -> &str {
        self.build_type
            .as_deref()
            .unwrap_or(DEFAULT_PAGES_BUILD_TYPE)
    }
}

impl BranchProtectionConfig {
    /// Returns true if no field of the rule is specified.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.required_reviews.is_none()
            && self.dismiss_stale_reviews.is_none()
            && self.require_code_owner_reviews.is_none()
            && self.require_status_checks.is_none()
            && self.status_checks.is_none()
            && self.enforce_admins.is_none()
            && self.require_linear_history.is_none()
            && self.allow_force_pushes.is_none()
            && self.allow_deletions.is_none()
    }
}
