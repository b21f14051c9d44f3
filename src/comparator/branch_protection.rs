//! Branch protection rules.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::BranchProtectionConfig;
use crate::error::{GatewayError, Result};
use crate::github::{BranchProtection, BranchProtectionGateway, EnabledFlag};
use crate::planner::diff::{
    CurrentBranchProtection, compare_branch_protection, summarize_branch_protection,
};
use crate::planner::{Category, Change, Plan};

use super::{Comparator, finish};

/// Compares every declared branch rule, in branch name order.
///
/// A branch without protection yields one `Add` keyed by the branch name
/// instead of a field-by-field diff.
#[derive(Debug)]
pub struct BranchProtectionComparator<'a, G: ?Sized> {
    gateway: &'a G,
    rules: &'a BTreeMap<String, BranchProtectionConfig>,
}

impl<'a, G: BranchProtectionGateway + ?Sized> BranchProtectionComparator<'a, G> {
    /// Creates a new branch protection comparator.
    #[must_use]
    pub const fn new(gateway: &'a G, rules: &'a BTreeMap<String, BranchProtectionConfig>) -> Self {
        Self { gateway, rules }
    }

    async fn compare_branch(
        &self,
        branch: &str,
        desired: &BranchProtectionConfig,
    ) -> Result<Vec<Change>> {
        match self.gateway.get_branch_protection(branch).await {
            Ok(protection) => Ok(compare_branch_protection(
                branch,
                &current_protection(&protection),
                desired,
            )),
            Err(GatewayError::BranchNotProtected { .. }) => {
                debug!("Branch {branch} is not protected");
                Ok(vec![Change::add(
                    Category::BranchProtection,
                    branch,
                    summarize_branch_protection(desired),
                )])
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Flattens the nested API response. Missing sections read as off.
fn current_protection(protection: &BranchProtection) -> CurrentBranchProtection {
    let reviews = protection.required_pull_request_reviews.as_ref();
    let checks = protection.required_status_checks.as_ref();
    let enabled = |flag: Option<&EnabledFlag>| flag.is_some_and(|f| f.enabled);

    CurrentBranchProtection {
        required_reviews: reviews.map_or(0, |r| r.required_approving_review_count),
        dismiss_stale_reviews: reviews.is_some_and(|r| r.dismiss_stale_reviews),
        require_code_owner_reviews: reviews.is_some_and(|r| r.require_code_owner_reviews),
        require_status_checks: checks.is_some_and(|c| c.strict),
        enforce_admins: enabled(protection.enforce_admins.as_ref()),
        require_linear_history: enabled(protection.required_linear_history.as_ref()),
        allow_force_pushes: enabled(protection.allow_force_pushes.as_ref()),
        allow_deletions: enabled(protection.allow_deletions.as_ref()),
        status_checks: checks
            .and_then(|c| c.contexts.clone())
            .unwrap_or_default(),
    }
}

#[async_trait]
impl<G: BranchProtectionGateway + ?Sized> Comparator for BranchProtectionComparator<'_, G> {
    fn name(&self) -> &'static str {
        "branch_protection"
    }

    async fn compare(&self) -> Result<Plan> {
        info!("Comparing protection for {} branch(es)", self.rules.len());

        let mut plan = Plan::new();
        for (branch, desired) in self.rules {
            plan.add_all(self.compare_branch(branch, desired).await?);
        }

        Ok(finish(self.name(), plan))
    }
}
