//! Issue labels.

use async_trait::async_trait;
use tracing::info;

use crate::config::LabelsConfig;
use crate::error::Result;
use crate::github::LabelGateway;
use crate::planner::Plan;
use crate::planner::diff::{CurrentLabel, compare_labels};

use super::{Comparator, finish};

/// Compares declared labels with the repository's labels.
#[derive(Debug)]
pub struct LabelsComparator<'a, G: ?Sized> {
    gateway: &'a G,
    desired: &'a LabelsConfig,
}

impl<'a, G: LabelGateway + ?Sized> LabelsComparator<'a, G> {
    /// Creates a new labels comparator.
    #[must_use]
    pub const fn new(gateway: &'a G, desired: &'a LabelsConfig) -> Self {
        Self { gateway, desired }
    }
}

#[async_trait]
impl<G: LabelGateway + ?Sized> Comparator for LabelsComparator<'_, G> {
    fn name(&self) -> &'static str {
        "labels"
    }

    async fn compare(&self) -> Result<Plan> {
        info!(
            "Comparing {} label(s), replace_default={}",
            self.desired.items.len(),
            self.desired.replace_default
        );

        let current: Vec<CurrentLabel> = self
            .gateway
            .get_labels()
            .await?
            .into_iter()
            .map(|label| CurrentLabel {
                description: label.description.value_or_default(),
                name: label.name,
                color: label.color,
            })
            .collect();

        let plan = compare_labels(&current, self.desired).into_iter().collect();
        Ok(finish(self.name(), plan))
    }
}
