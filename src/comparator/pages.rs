//! GitHub Pages.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::PagesConfig;
use crate::error::{GatewayError, Result};
use crate::github::{Pages, PagesGateway};
use crate::planner::diff::{CurrentPages, CurrentPagesSource, compare_pages, summarize_pages};
use crate::planner::{Category, Change, Plan};

use super::{Comparator, finish};

/// Key of the single change emitted when Pages has to be enabled.
const PAGES_KEY: &str = "pages";

/// Compares the Pages site. A disabled site yields one `Add`.
#[derive(Debug)]
pub struct PagesComparator<'a, G: ?Sized> {
    gateway: &'a G,
    desired: &'a PagesConfig,
}

impl<'a, G: PagesGateway + ?Sized> PagesComparator<'a, G> {
    /// Creates a new pages comparator.
    #[must_use]
    pub const fn new(gateway: &'a G, desired: &'a PagesConfig) -> Self {
        Self { gateway, desired }
    }
}

fn current_pages(pages: Pages) -> CurrentPages {
    CurrentPages {
        build_type: pages.build_type.value_or_default(),
        source: pages.source.map(|s| CurrentPagesSource {
            branch: s.branch,
            path: s.path,
        }),
    }
}

#[async_trait]
impl<G: PagesGateway + ?Sized> Comparator for PagesComparator<'_, G> {
    fn name(&self) -> &'static str {
        "pages"
    }

    async fn compare(&self) -> Result<Plan> {
        info!("Comparing Pages site");

        let plan = match self.gateway.get_pages().await {
            Ok(pages) => compare_pages(&current_pages(pages), self.desired)
                .into_iter()
                .collect(),
            Err(GatewayError::PagesNotEnabled) => {
                debug!("Pages not enabled");
                let mut plan = Plan::new();
                plan.add(Change::add(
                    Category::Pages,
                    PAGES_KEY,
                    summarize_pages(self.desired),
                ));
                plan
            }
            Err(e) => return Err(e.into()),
        };

        Ok(finish(self.name(), plan))
    }
}
