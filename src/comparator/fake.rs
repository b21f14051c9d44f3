//! In-memory gateway for comparator and reconciler tests.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{GatewayError, GatewayResult};
use crate::github::{
    ActionsGateway, ActionsPermissions, BranchProtection, BranchProtectionGateway, EnvGateway,
    Label, LabelGateway, Pages, PagesGateway, RepoGateway, Repository, SelectedActions, Variable,
    WorkflowPermissions,
};

/// Canned responses. Unset branch entries read as unprotected.
#[derive(Debug, Clone)]
pub struct FakeGateway {
    pub repo: GatewayResult<Repository>,
    pub protections: HashMap<String, GatewayResult<BranchProtection>>,
    pub labels: GatewayResult<Vec<Label>>,
    pub secrets: GatewayResult<Vec<String>>,
    pub variables: GatewayResult<Vec<Variable>>,
    pub permissions: GatewayResult<ActionsPermissions>,
    pub selected: GatewayResult<SelectedActions>,
    pub workflow: GatewayResult<WorkflowPermissions>,
    pub pages: GatewayResult<Pages>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            repo: Ok(Repository::default()),
            protections: HashMap::new(),
            labels: Ok(Vec::new()),
            secrets: Ok(Vec::new()),
            variables: Ok(Vec::new()),
            permissions: Ok(ActionsPermissions::default()),
            selected: Ok(SelectedActions::default()),
            workflow: Ok(WorkflowPermissions::default()),
            pages: Err(GatewayError::PagesNotEnabled),
        }
    }
}

impl FakeGateway {
    pub fn with_protection(mut self, branch: &str, protection: BranchProtection) -> Self {
        self.protections
            .insert(branch.to_string(), Ok(protection));
        self
    }
}

#[async_trait]
impl RepoGateway for FakeGateway {
    async fn get_repo(&self) -> GatewayResult<Repository> {
        self.repo.clone()
    }
}

#[async_trait]
impl BranchProtectionGateway for FakeGateway {
    async fn get_branch_protection(&self, branch: &str) -> GatewayResult<BranchProtection> {
        self.protections.get(branch).cloned().unwrap_or_else(|| {
            Err(GatewayError::BranchNotProtected {
                branch: branch.to_string(),
            })
        })
    }
}

#[async_trait]
impl LabelGateway for FakeGateway {
    async fn get_labels(&self) -> GatewayResult<Vec<Label>> {
        self.labels.clone()
    }
}

#[async_trait]
impl EnvGateway for FakeGateway {
    async fn get_secrets(&self) -> GatewayResult<Vec<String>> {
        self.secrets.clone()
    }

    async fn get_variables(&self) -> GatewayResult<Vec<Variable>> {
        self.variables.clone()
    }
}

#[async_trait]
impl ActionsGateway for FakeGateway {
    async fn get_actions_permissions(&self) -> GatewayResult<ActionsPermissions> {
        self.permissions.clone()
    }

    async fn get_actions_selected_actions(&self) -> GatewayResult<SelectedActions> {
        self.selected.clone()
    }

    async fn get_actions_workflow_permissions(&self) -> GatewayResult<WorkflowPermissions> {
        self.workflow.clone()
    }
}

#[async_trait]
impl PagesGateway for FakeGateway {
    async fn get_pages(&self) -> GatewayResult<Pages> {
        self.pages.clone()
    }
}
