//! Repository topics.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::Result;
use crate::github::RepoGateway;
use crate::planner::Plan;
use crate::planner::diff::compare_topics;

use super::{Comparator, finish};

/// Compares the topic list as a set.
#[derive(Debug)]
pub struct TopicsComparator<'a, G: ?Sized> {
    gateway: &'a G,
    desired: Option<&'a [String]>,
}

impl<'a, G: RepoGateway + ?Sized> TopicsComparator<'a, G> {
    /// Creates a new topics comparator. `None` leaves topics unmanaged.
    #[must_use]
    pub const fn new(gateway: &'a G, desired: Option<&'a [String]>) -> Self {
        Self { gateway, desired }
    }
}

#[async_trait]
impl<G: RepoGateway + ?Sized> Comparator for TopicsComparator<'_, G> {
    fn name(&self) -> &'static str {
        "topics"
    }

    async fn compare(&self) -> Result<Plan> {
        let Some(desired) = self.desired else {
            debug!("Topics not managed, skipping fetch");
            return Ok(Plan::new());
        };
        info!("Comparing {} topic(s)", desired.len());

        let repo = self.gateway.get_repo().await?;
        let plan = compare_topics(&repo.topics, Some(desired))
            .into_iter()
            .collect();

        Ok(finish(self.name(), plan))
    }
}
