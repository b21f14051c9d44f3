//! Configuration parser for loading the desired-state file.
//!
//! This module handles loading configuration from YAML files and environment
//! variables, with proper precedence and error handling.

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::DesiredState;

/// Environment variable overriding `repository.owner`.
pub const ENV_OWNER: &str = "GH_RECONCILE_OWNER";

/// Environment variable overriding `repository.name`.
pub const ENV_REPO: &str = "GH_RECONCILE_REPO";

/// Token variables, in lookup order.
pub const TOKEN_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "GITHUB_API_URL";

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    ".github/repo-settings.yaml",
    ".github/repo-settings.yml",
    "repo-settings.yaml",
    "repo-settings.yml",
];

/// Configuration parser for the desired-state file.
#[derive(Debug, Default)]
pub struct ConfigParser;

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<DesiredState> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to read file: {e}"),
            location: Some(path.display().to_string()),
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<DesiredState> {
        debug!("Parsing YAML configuration");

        let config: DesiredState = serde_yaml::from_str(content).map_err(|e| {
            let location = match (source, e.location()) {
                (Some(p), Some(l)) => Some(format!("{}:{}:{}", p.display(), l.line(), l.column())),
                (Some(p), None) => Some(p.display().to_string()),
                (None, Some(l)) => Some(format!("line {}, column {}", l.line(), l.column())),
                (None, None) => None,
            };
            ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            }
        })?;

        debug!(
            "Parsed configuration for {} ({} managed item(s))",
            config.full_name(),
            config.managed_item_count()
        );
        Ok(config)
    }

    /// Loads configuration with environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<DesiredState> {
        let mut config = self.load_file(path)?;
        Self::apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        Ok(config)
    }

    /// Applies repository coordinate overrides read through `lookup`.
    pub fn apply_env_overrides(
        config: &mut DesiredState,
        lookup: impl Fn(&str) -> Option<String>,
    ) {
        if let Some(owner) = lookup(ENV_OWNER).filter(|v| !v.is_empty()) {
            debug!("Overriding repository.owner from environment");
            config.repository.owner = owner;
        }

        if let Some(name) = lookup(ENV_REPO).filter(|v| !v.is_empty()) {
            debug!("Overriding repository.name from environment");
            config.repository.name = name;
        }
    }

    /// Gets the GitHub token from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no token variable is set.
    pub fn get_github_token() -> Result<String> {
        Self::token_from(|name| std::env::var(name).ok())
    }

    fn token_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        TOKEN_VARS
            .iter()
            .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| {
                ConfigError::MissingEnvVar {
                    name: TOKEN_VARS.join(" or "),
                }
                .into()
            })
    }

    /// Gets the API base URL override from the environment (optional).
    #[must_use]
    pub fn get_api_url() -> Option<String> {
        std::env::var(ENV_API_URL).ok().filter(|v| !v.is_empty())
    }
}

/// Finds the configuration file in the current directory or parent directories.
///
/// # Errors
///
/// Returns an error if no configuration file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    const FULL_CONFIG: &str = r##"
repository:
  owner: acme
  name: widget

settings:
  description: "Widget service"
  visibility: public
  allow_squash_merge: true
  allow_merge_commit: false
  topics: [rust, cli]

labels:
  replace_default: true
  items:
    - name: bug
      color: d73a4a
      description: Something is broken
    - name: chore
      color: "#ededed"

branch_protection:
  main:
    required_reviews: 2
    enforce_admins: true
    status_checks: [ci, lint]

env:
  secrets: [API_KEY]
  variables:
    ENV: prod

actions:
  enabled: true
  allowed_actions: selected
  selected_actions:
    github_owned_allowed: true
    patterns_allowed: ["docker/*"]
  default_workflow_permissions: read

pages:
  build_type: legacy
  source:
    branch: gh-pages
    path: /
"##;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r"
repository:
  owner: acme
  name: widget
";
        let config = ConfigParser::new()
            .parse_yaml(yaml, None)
            .expect("minimal config should parse");

        assert_eq!(config.full_name(), "acme/widget");
        assert!(config.settings.is_none());
        assert!(config.branch_protection.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = ConfigParser::new()
            .parse_yaml(FULL_CONFIG, None)
            .expect("full config should parse");

        let settings = config.settings.as_ref().expect("settings");
        assert_eq!(settings.allow_merge_commit, Some(false));
        assert_eq!(settings.homepage, None);
        assert_eq!(settings.topics.as_deref().map(<[String]>::len), Some(2));

        let labels = config.labels.as_ref().expect("labels");
        assert!(labels.replace_default);
        assert_eq!(labels.items[1].description, None);
        assert_eq!(labels.items[1].color, "#ededed");

        let main = &config.branch_protection["main"];
        assert_eq!(main.required_reviews, Some(2));
        assert_eq!(main.allow_force_pushes, None);

        let env = config.env.as_ref().expect("env");
        assert_eq!(env.variables.get("ENV").map(String::as_str), Some("prod"));

        let actions = config.actions.as_ref().expect("actions");
        assert_eq!(
            actions
                .selected_actions
                .as_ref()
                .and_then(|s| s.verified_allowed),
            None
        );
        assert_eq!(
            actions
                .selected_actions
                .as_ref()
                .and_then(|s| s.patterns_allowed.as_deref()),
            Some([String::from("docker/*")].as_slice())
        );

        assert_eq!(
            config.pages.as_ref().map(crate::config::PagesConfig::effective_build_type),
            Some("legacy")
        );
    }

    #[test]
    fn test_parse_error_has_location() {
        let err = ConfigParser::new()
            .parse_yaml("repository: [not, a, map]", Some(Path::new("settings.yaml")))
            .expect_err("should fail");

        match err {
            Error::Config(ConfigError::ParseError { location, .. }) => {
                assert!(location.is_some_and(|l| l.starts_with("settings.yaml")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConfigParser::new()
            .parse_yaml(FULL_CONFIG, None)
            .expect("config should parse");
        let env = HashMap::from([(ENV_REPO, "gadget"), (ENV_OWNER, "")]);

        ConfigParser::apply_env_overrides(&mut config, |name| {
            env.get(name).map(|v| (*v).to_string())
        });

        assert_eq!(config.full_name(), "acme/gadget");
    }

    #[test]
    fn test_token_fallback() {
        let token = ConfigParser::token_from(|name| {
            (name == "GH_TOKEN").then(|| String::from("ghp_fallback"))
        })
        .expect("fallback token");
        assert_eq!(token, "ghp_fallback");

        let err = ConfigParser::token_from(|_| None).expect_err("no token");
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingEnvVar { .. })
        ));
    }

    #[test]
    fn test_find_config_file_searches_upward() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).expect("nested dirs");
        std::fs::create_dir_all(dir.path().join(".github")).expect("github dir");
        let expected = dir.path().join(".github/repo-settings.yml");
        std::fs::write(&expected, "repository: {owner: a, name: b}\n").expect("write");

        let found = find_config_file(&nested).expect("should find file");

        assert_eq!(found, expected);
    }
}
