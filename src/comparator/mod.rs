//! Category comparators.
//!
//! A comparator fetches one category's current state through its gateway
//! capability, maps the API shape onto the snapshot the pure diff functions
//! expect, and returns the resulting sub-plan. Category policy lives here,
//! such as turning absence signals into `Add` changes.
//!
//! A fetch failure aborts the whole category. No partial plan is returned.

mod actions;
mod branch_protection;
mod env;
mod labels;
mod pages;
mod repo;
mod topics;

#[cfg(test)]
pub(crate) mod fake;

pub use actions::ActionsComparator;
pub use branch_protection::BranchProtectionComparator;
pub use env::{EnvComparator, EnvOptions};
pub use labels::LabelsComparator;
pub use pages::PagesComparator;
pub use repo::RepoComparator;
pub use topics::TopicsComparator;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::Result;
use crate::planner::Plan;

/// Compares one configuration area against the live repository.
#[async_trait]
pub trait Comparator: Send + Sync {
    /// Short name used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Fetches current state and returns the changes needed to reach the
    /// declared state.
    ///
    /// # Errors
    ///
    /// Returns the gateway error of the first failed fetch. Absence signals
    /// are never returned as errors.
    async fn compare(&self) -> Result<Plan>;
}

/// Logs a finished comparison and hands the plan back.
fn finish(name: &str, plan: Plan) -> Plan {
    for change in &plan {
        debug!("{name}: {change}");
    }
    info!("Compared {name}: {} change(s)", plan.size());
    plan
}
