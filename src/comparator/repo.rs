//! Repository scalar settings.

use async_trait::async_trait;
use tracing::info;

use crate::config::SettingsConfig;
use crate::error::Result;
use crate::github::{RepoGateway, Repository};
use crate::planner::Plan;
use crate::planner::diff::{CurrentRepo, compare_repo_settings};

use super::{Comparator, finish};

/// Compares description, homepage, visibility and merge settings.
#[derive(Debug)]
pub struct RepoComparator<'a, G: ?Sized> {
    gateway: &'a G,
    desired: &'a SettingsConfig,
}

impl<'a, G: RepoGateway + ?Sized> RepoComparator<'a, G> {
    /// Creates a new repository settings comparator.
    #[must_use]
    pub const fn new(gateway: &'a G, desired: &'a SettingsConfig) -> Self {
        Self { gateway, desired }
    }
}

/// Normalizes the API response. `null` and missing strings read as empty.
fn current_repo(repo: &Repository) -> CurrentRepo {
    CurrentRepo {
        description: repo.description.value_or_default(),
        homepage: repo.homepage.value_or_default(),
        visibility: repo.effective_visibility(),
        allow_merge_commit: repo.allow_merge_commit,
        allow_squash_merge: repo.allow_squash_merge,
        allow_rebase_merge: repo.allow_rebase_merge,
        allow_auto_merge: repo.allow_auto_merge,
        delete_branch_on_merge: repo.delete_branch_on_merge,
        allow_update_branch: repo.allow_update_branch,
        topics: repo.topics.clone(),
    }
}

#[async_trait]
impl<G: RepoGateway + ?Sized> Comparator for RepoComparator<'_, G> {
    fn name(&self) -> &'static str {
        "repo"
    }

    async fn compare(&self) -> Result<Plan> {
        info!("Comparing repository settings");

        let repo = self.gateway.get_repo().await?;
        let plan = compare_repo_settings(&current_repo(&repo), self.desired)
            .into_iter()
            .collect();

        Ok(finish(self.name(), plan))
    }
}
