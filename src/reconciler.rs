//! Reconciler producing one plan for a whole repository.
//!
//! This module builds a comparator for every section present in the desired
//! state, runs them concurrently, and merges their sub-plans in a fixed
//! category order. A failing category is reported next to the plan instead
//! of aborting the run.

use async_trait::async_trait;
use std::fmt;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::comparator::{
    ActionsComparator, BranchProtectionComparator, Comparator, EnvComparator, EnvOptions,
    LabelsComparator, PagesComparator, RepoComparator, TopicsComparator,
};
use crate::config::{DesiredState, LocalOverrides};
use crate::error::{Error, GatewayResult};
use crate::github::{Gateway, RepoGateway, Repository};
use crate::planner::{Category, Plan};

/// Limits and toggles for a planning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    /// Categories to compare. `None` compares every declared section.
    pub categories: Option<Vec<Category>>,
    /// Delete undeclared secrets and variables.
    pub sync_delete: bool,
    /// Compare secrets.
    pub secrets: bool,
    /// Compare variables.
    pub variables: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            categories: None,
            sync_delete: false,
            secrets: true,
            variables: true,
        }
    }
}

impl PlanOptions {
    /// Returns true if `category` takes part in the run.
    #[must_use]
    pub fn includes(&self, category: Category) -> bool {
        self.categories
            .as_ref()
            .is_none_or(|categories| categories.contains(&category))
    }
}

/// A comparator that could not fetch its current state.
#[derive(Debug)]
pub struct CategoryFailure {
    /// Comparator name.
    pub comparator: &'static str,
    /// The underlying error.
    pub error: Error,
}

impl fmt::Display for CategoryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.comparator, self.error)
    }
}

/// Result of a planning run.
#[derive(Debug, Default)]
pub struct PlanReport {
    /// Merged changes of every successful category.
    pub plan: Plan,
    /// Categories whose comparison failed. They contribute no changes.
    pub failures: Vec<CategoryFailure>,
}

impl PlanReport {
    /// Returns true if every category was compared.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Reconciler comparing a desired state against the live repository.
pub struct Reconciler<'a, G: Gateway + ?Sized> {
    /// Desired state.
    config: &'a DesiredState,
    /// Gateway for current state.
    gateway: &'a G,
    /// Local values for secrets and variables.
    overrides: &'a LocalOverrides,
    /// Run options.
    options: PlanOptions,
}

impl<'a, G: Gateway + ?Sized> Reconciler<'a, G> {
    /// Creates a new reconciler with default options.
    #[must_use]
    pub fn new(config: &'a DesiredState, gateway: &'a G, overrides: &'a LocalOverrides) -> Self {
        Self {
            config,
            gateway,
            overrides,
            options: PlanOptions::default(),
        }
    }

    /// Sets the run options.
    #[must_use]
    pub fn with_options(mut self, options: PlanOptions) -> Self {
        self.options = options;
        self
    }

    fn env_options(&self) -> EnvOptions {
        EnvOptions {
            secrets: self.options.secrets && self.options.includes(Category::Secrets),
            variables: self.options.variables && self.options.includes(Category::Variables),
            sync_delete: self.options.sync_delete,
        }
    }

    /// Compares every selected category and merges the results.
    pub async fn plan(&self) -> PlanReport {
        info!("Planning {}", self.config.full_name());

        let options = &self.options;
        let gateway = self.gateway;
        let config = self.config;

        let settings = config
            .settings
            .as_ref()
            .filter(|_| options.includes(Category::Repo));
        let shared_repo = SharedRepo::new(gateway);
        let repo = settings.map(|s| RepoComparator::new(&shared_repo, s));

        let topics = config
            .settings
            .as_ref()
            .and_then(|s| s.topics.as_deref())
            .filter(|_| options.includes(Category::Topics))
            .map(|t| TopicsComparator::new(&shared_repo, Some(t)));

        let labels = config
            .labels
            .as_ref()
            .filter(|_| options.includes(Category::Labels))
            .map(|l| LabelsComparator::new(gateway, l));

        let protection = (!config.branch_protection.is_empty()
            && options.includes(Category::BranchProtection))
        .then(|| BranchProtectionComparator::new(gateway, &config.branch_protection));

        let actions = config
            .actions
            .as_ref()
            .filter(|_| options.includes(Category::Actions))
            .map(|a| ActionsComparator::new(gateway, a));

        let pages = config
            .pages
            .as_ref()
            .filter(|_| options.includes(Category::Pages))
            .map(|p| PagesComparator::new(gateway, p));

        let env_options = self.env_options();
        let env = config
            .env
            .as_ref()
            .filter(|_| env_options.secrets || env_options.variables)
            .map(|e| EnvComparator::new(gateway, e, self.overrides).with_options(env_options));

        let outcomes = tokio::join!(
            run(repo),
            run(topics),
            run(labels),
            run(protection),
            run(actions),
            run(pages),
            run(env),
        );
        let outcomes = [
            outcomes.0, outcomes.1, outcomes.2, outcomes.3, outcomes.4, outcomes.5, outcomes.6,
        ];

        let mut report = PlanReport::default();
        for outcome in outcomes.into_iter().flatten() {
            match outcome {
                Ok(plan) => report.plan = report.plan.merge(&plan),
                Err(failure) => report.failures.push(failure),
            }
        }

        let counts = report.plan.count_by_type();
        info!(
            "Plan: {} to add, {} to update, {} to delete, {} missing ({} failed categor(ies))",
            counts.add,
            counts.update,
            counts.delete,
            counts.missing,
            report.failures.len()
        );

        report
    }
}

/// Serves a single `get_repo` response to every comparator of one run.
struct SharedRepo<'a, G: ?Sized> {
    gateway: &'a G,
    repo: OnceCell<GatewayResult<Repository>>,
}

impl<'a, G: RepoGateway + ?Sized> SharedRepo<'a, G> {
    const fn new(gateway: &'a G) -> Self {
        Self {
            gateway,
            repo: OnceCell::const_new(),
        }
    }
}

#[async_trait]
impl<G: RepoGateway + ?Sized> RepoGateway for SharedRepo<'_, G> {
    async fn get_repo(&self) -> GatewayResult<Repository> {
        self.repo
            .get_or_init(|| self.gateway.get_repo())
            .await
            .clone()
    }
}

/// Runs one optional comparator, turning its error into a failure record.
async fn run<C: Comparator>(comparator: Option<C>) -> Option<Result<Plan, CategoryFailure>> {
    let comparator = comparator?;
    Some(comparator.compare().await.map_err(|error| {
        warn!("Comparison of {} failed: {error}", comparator.name());
        CategoryFailure {
            comparator: comparator.name(),
            error,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::fake::FakeGateway;
    use crate::config::{
        ActionsConfig, BranchProtectionConfig, EnvConfig, LabelConfig, LabelsConfig, PagesConfig,
        RepositoryConfig, SettingsConfig,
    };
    use crate::error::GatewayError;
    use crate::github::{ActionsPermissions, BranchProtection, Repository, Variable};
    use crate::planner::ChangeType;
    use mockall::mock;
    use std::collections::BTreeMap;

    mock! {
        Repo {}

        #[async_trait]
        impl RepoGateway for Repo {
            async fn get_repo(&self) -> GatewayResult<Repository>;
        }
    }

    fn desired() -> DesiredState {
        DesiredState {
            repository: RepositoryConfig {
                owner: String::from("acme"),
                name: String::from("widget"),
            },
            settings: Some(SettingsConfig {
                description: Some(String::from("Widget service")),
                topics: Some(vec![String::from("rust")]),
                ..Default::default()
            }),
            labels: Some(LabelsConfig {
                replace_default: false,
                items: vec![LabelConfig {
                    name: String::from("bug"),
                    color: String::from("d73a4a"),
                    description: None,
                }],
            }),
            branch_protection: BTreeMap::from([(
                String::from("main"),
                BranchProtectionConfig {
                    required_reviews: Some(1),
                    ..Default::default()
                },
            )]),
            env: Some(EnvConfig {
                secrets: vec![String::from("API_KEY")],
                variables: BTreeMap::from([(String::from("ENV"), String::from("prod"))]),
            }),
            actions: Some(ActionsConfig {
                enabled: Some(true),
                ..Default::default()
            }),
            pages: Some(PagesConfig::default()),
        }
    }

    fn gateway() -> FakeGateway {
        FakeGateway {
            repo: Ok(Repository {
                visibility: Some(String::from("public")),
                ..Default::default()
            }),
            variables: Ok(vec![Variable {
                name: String::from("STALE"),
                value: String::from("1"),
            }]),
            permissions: Ok(ActionsPermissions {
                enabled: false,
                allowed_actions: None,
            }),
            ..Default::default()
        }
        .with_protection("main", BranchProtection::default())
    }

    #[tokio::test]
    async fn test_categories_merge_in_fixed_order() {
        let config = desired();
        let gateway = gateway();
        let overrides = LocalOverrides::empty();

        let report = Reconciler::new(&config, &gateway, &overrides).plan().await;

        assert!(report.is_complete());
        assert_eq!(
            report.plan.categories(),
            [
                Category::Repo,
                Category::Topics,
                Category::Labels,
                Category::BranchProtection,
                Category::Actions,
                Category::Pages,
                Category::Secrets,
                Category::Variables,
            ]
        );
        assert!(report.plan.has_missing_secrets());
        assert!(!report.plan.has_deletes());
    }

    #[tokio::test]
    async fn test_failed_category_is_isolated() {
        let config = desired();
        let gateway = FakeGateway {
            labels: Err(GatewayError::PermissionDenied {
                message: String::from("Resource not accessible by integration"),
            }),
            ..gateway()
        };
        let overrides = LocalOverrides::empty();

        let report = Reconciler::new(&config, &gateway, &overrides).plan().await;

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].comparator, "labels");
        assert!(report.plan.filter_by_category(Category::Labels).is_empty());
        assert!(!report.plan.filter_by_category(Category::Repo).is_empty());
    }

    #[tokio::test]
    async fn test_category_filter_and_sync_delete() {
        let config = desired();
        let gateway = FakeGateway {
            repo: Err(GatewayError::network("unreachable")),
            ..gateway()
        };
        let overrides = LocalOverrides::empty();
        let options = PlanOptions {
            categories: Some(vec![Category::Variables]),
            sync_delete: true,
            ..PlanOptions::default()
        };

        let report = Reconciler::new(&config, &gateway, &overrides)
            .with_options(options)
            .plan()
            .await;

        assert!(report.is_complete());
        assert_eq!(report.plan.categories(), [Category::Variables]);
        let summary: Vec<(ChangeType, &str)> = report
            .plan
            .iter()
            .map(|c| (c.change_type(), c.key()))
            .collect();
        assert_eq!(
            summary,
            [(ChangeType::Add, "ENV"), (ChangeType::Delete, "STALE")]
        );
    }

    #[test]
    fn test_plan_options_includes() {
        let options = PlanOptions {
            categories: Some(vec![Category::Labels]),
            ..PlanOptions::default()
        };
        assert!(options.includes(Category::Labels));
        assert!(!options.includes(Category::Repo));
        assert!(PlanOptions::default().includes(Category::Pages));
    }

    #[test]
    fn test_plan_runs_outside_async_context() {
        let config = desired();
        let gateway = gateway();
        let overrides = LocalOverrides::empty();

        let report =
            tokio_test::block_on(Reconciler::new(&config, &gateway, &overrides).plan());

        assert!(!report.plan.is_empty());
    }

    #[tokio::test]
    async fn test_repo_and_topics_share_one_fetch() {
        let mut gateway = MockRepo::new();
        gateway.expect_get_repo().times(1).returning(|| {
            Ok(Repository {
                topics: vec![String::from("rust")],
                ..Default::default()
            })
        });
        let shared = SharedRepo::new(&gateway);
        let settings = SettingsConfig {
            description: Some(String::from("Widget service")),
            ..Default::default()
        };
        let topics = vec![String::from("cli")];

        let repo_comparator = RepoComparator::new(&shared, &settings);
        let topics_comparator = TopicsComparator::new(&shared, Some(topics.as_slice()));
        let (repo_plan, topics_plan) = tokio::join!(
            repo_comparator.compare(),
            topics_comparator.compare(),
        );

        assert_eq!(repo_plan.expect("repo plan").size(), 1);
        assert_eq!(topics_plan.expect("topics plan").size(), 1);
    }
}
