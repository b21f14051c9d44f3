//! Configuration module for the reconciler.
//!
//! This module handles all configuration-related functionality:
//! - Parsing and deserializing `repo-settings.yaml`
//! - Validation of configuration values
//! - Local override values for secrets and variables

mod overrides;
mod parser;
mod spec;
mod validator;

pub use overrides::{DEFAULT_OVERRIDES_FILE, LocalOverrides};
pub use parser::{
    ConfigParser, DEFAULT_CONFIG_FILES, ENV_API_URL, ENV_OWNER, ENV_REPO, TOKEN_VARS,
    find_config_file,
};
pub use spec::{
    ActionsConfig, BranchProtectionConfig, DEFAULT_PAGES_BUILD_TYPE, DesiredState, EnvConfig,
    LabelConfig, LabelsConfig, PagesConfig, PagesSourceConfig, RepositoryConfig,
    SelectedActionsConfig, SettingsConfig,
};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
