//! Capability traits for reading current repository state.
//!
//! Each comparator depends only on the capability it needs, so tests can
//! substitute a small fake for one category without implementing the rest.

use async_trait::async_trait;

use crate::error::GatewayResult;

use super::types::{
    ActionsPermissions, BranchProtection, Label, Pages, Repository, SelectedActions, Variable,
    WorkflowPermissions,
};

/// Repository metadata.
#[async_trait]
pub trait RepoGateway: Send + Sync {
    /// Fetches repository settings and topics.
    async fn get_repo(&self) -> GatewayResult<Repository>;
}

/// Branch protection rules.
#[async_trait]
pub trait BranchProtectionGateway: Send + Sync {
    /// Fetches the protection rule of `branch`.
    ///
    /// Returns [`GatewayError::BranchNotProtected`](crate::error::GatewayError::BranchNotProtected)
    /// when the branch has no rule.
    async fn get_branch_protection(&self, branch: &str) -> GatewayResult<BranchProtection>;
}

/// Issue labels.
#[async_trait]
pub trait LabelGateway: Send + Sync {
    /// Fetches all labels.
    async fn get_labels(&self) -> GatewayResult<Vec<Label>>;
}

/// Actions secrets and variables.
#[async_trait]
pub trait EnvGateway: Send + Sync {
    /// Fetches secret names. Values are never readable.
    async fn get_secrets(&self) -> GatewayResult<Vec<String>>;

    /// Fetches variables with their values.
    async fn get_variables(&self) -> GatewayResult<Vec<Variable>>;
}

/// Actions permissions.
#[async_trait]
pub trait ActionsGateway: Send + Sync {
    /// Fetches the enabled flag and allowed-actions mode.
    async fn get_actions_permissions(&self) -> GatewayResult<ActionsPermissions>;

    /// Fetches the allow-list used by the `selected` mode.
    async fn get_actions_selected_actions(&self) -> GatewayResult<SelectedActions>;

    /// Fetches default workflow token permissions.
    async fn get_actions_workflow_permissions(&self) -> GatewayResult<WorkflowPermissions>;
}

/// GitHub Pages.
#[async_trait]
pub trait PagesGateway: Send + Sync {
    /// Fetches the Pages site.
    ///
    /// Returns [`GatewayError::PagesNotEnabled`](crate::error::GatewayError::PagesNotEnabled)
    /// when the repository has no site.
    async fn get_pages(&self) -> GatewayResult<Pages>;
}

/// Every read capability at once.
pub trait Gateway:
    RepoGateway + BranchProtectionGateway + LabelGateway + EnvGateway + ActionsGateway + PagesGateway
{
}

impl<T> Gateway for T where
    T: RepoGateway
        + BranchProtectionGateway
        + LabelGateway
        + EnvGateway
        + ActionsGateway
        + PagesGateway
{
}
