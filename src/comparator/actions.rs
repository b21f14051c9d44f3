//! Actions permissions.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::ActionsConfig;
use crate::error::Result;
use crate::github::ActionsGateway;
use crate::planner::Plan;
use crate::planner::diff::{
    CurrentActionsPermissions, CurrentSelectedActions, CurrentWorkflowPermissions,
    compare_actions_permissions, compare_selected_actions, compare_workflow_permissions,
};

use super::{Comparator, finish};

/// Compares the Actions policy in three steps: permissions, the selected
/// actions allow-list, and default workflow permissions.
///
/// The allow-list endpoint fails whenever the repository is not in
/// `selected` mode, so any error there is logged and replaced by an empty
/// snapshot. Errors from the other two endpoints abort the category.
#[derive(Debug)]
pub struct ActionsComparator<'a, G: ?Sized> {
    gateway: &'a G,
    desired: &'a ActionsConfig,
}

impl<'a, G: ActionsGateway + ?Sized> ActionsComparator<'a, G> {
    /// Creates a new actions comparator.
    #[must_use]
    pub const fn new(gateway: &'a G, desired: &'a ActionsConfig) -> Self {
        Self { gateway, desired }
    }

    async fn current_selected_actions(&self) -> CurrentSelectedActions {
        match self.gateway.get_actions_selected_actions().await {
            Ok(selected) => CurrentSelectedActions {
                github_owned_allowed: selected.github_owned_allowed,
                verified_allowed: selected.verified_allowed,
                patterns_allowed: selected.patterns_allowed,
            },
            Err(e) => {
                warn!("Selected actions unavailable, comparing against an empty allow-list: {e}");
                CurrentSelectedActions::default()
            }
        }
    }

    const fn manages_workflow_permissions(&self) -> bool {
        self.desired.default_workflow_permissions.is_some()
            || self.desired.can_approve_pull_request_reviews.is_some()
    }
}

#[async_trait]
impl<G: ActionsGateway + ?Sized> Comparator for ActionsComparator<'_, G> {
    fn name(&self) -> &'static str {
        "actions"
    }

    async fn compare(&self) -> Result<Plan> {
        info!("Comparing Actions permissions");

        let mut plan = Plan::new();

        let permissions = self.gateway.get_actions_permissions().await?;
        let current = CurrentActionsPermissions {
            enabled: permissions.enabled,
            allowed_actions: permissions.allowed_actions.unwrap_or_default(),
        };
        plan.add_all(compare_actions_permissions(&current, self.desired));

        if let Some(selected) = &self.desired.selected_actions {
            let current = self.current_selected_actions().await;
            plan.add_all(compare_selected_actions(&current, selected));
        }

        if self.manages_workflow_permissions() {
            let workflow = self.gateway.get_actions_workflow_permissions().await?;
            let current = CurrentWorkflowPermissions {
                default_workflow_permissions: workflow.default_workflow_permissions,
                can_approve_pull_request_reviews: workflow.can_approve_pull_request_reviews,
            };
            plan.add_all(compare_workflow_permissions(&current, self.desired));
        } else {
            debug!("Workflow permissions not managed, skipping fetch");
        }

        Ok(finish(self.name(), plan))
    }
}
