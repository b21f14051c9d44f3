//! Actions secrets and variables.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::{EnvConfig, LocalOverrides};
use crate::error::Result;
use crate::github::EnvGateway;
use crate::planner::Plan;
use crate::planner::diff::{CurrentVariable, compare_secrets, compare_variables};

use super::{Comparator, finish};

/// Toggles for the env comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvOptions {
    /// Run the secrets pass.
    pub secrets: bool,
    /// Run the variables pass.
    pub variables: bool,
    /// Delete undeclared secrets and variables.
    pub sync_delete: bool,
}

impl Default for EnvOptions {
    fn default() -> Self {
        Self {
            secrets: true,
            variables: true,
            sync_delete: false,
        }
    }
}

/// Compares declared secrets and variables, resolving values through the
/// local override source first.
#[derive(Debug)]
pub struct EnvComparator<'a, G: ?Sized> {
    gateway: &'a G,
    desired: &'a EnvConfig,
    overrides: &'a LocalOverrides,
    options: EnvOptions,
}

impl<'a, G: EnvGateway + ?Sized> EnvComparator<'a, G> {
    /// Creates a new env comparator with both passes enabled.
    #[must_use]
    pub fn new(gateway: &'a G, desired: &'a EnvConfig, overrides: &'a LocalOverrides) -> Self {
        Self {
            gateway,
            desired,
            overrides,
            options: EnvOptions::default(),
        }
    }

    /// Sets the pass toggles.
    #[must_use]
    pub const fn with_options(mut self, options: EnvOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl<G: EnvGateway + ?Sized> Comparator for EnvComparator<'_, G> {
    fn name(&self) -> &'static str {
        "env"
    }

    async fn compare(&self) -> Result<Plan> {
        info!(
            "Comparing {} secret(s) and {} variable(s) ({} override value(s) from {})",
            self.desired.secrets.len(),
            self.desired.variables.len(),
            self.overrides.len(),
            self.overrides.origin()
        );

        let mut plan = Plan::new();

        if self.options.secrets {
            let current = self.gateway.get_secrets().await?;
            plan.add_all(compare_secrets(
                &current,
                &self.desired.secrets,
                self.overrides,
                self.options.sync_delete,
            ));
        } else {
            debug!("Secrets pass disabled");
        }

        if self.options.variables {
            let current: Vec<CurrentVariable> = self
                .gateway
                .get_variables()
                .await?
                .into_iter()
                .map(|v| CurrentVariable {
                    name: v.name,
                    value: v.value,
                })
                .collect();
            plan.add_all(compare_variables(
                &current,
                &self.desired.variables,
                self.overrides,
                self.options.sync_delete,
            ));
        } else {
            debug!("Variables pass disabled");
        }

        Ok(finish(self.name(), plan))
    }
}
