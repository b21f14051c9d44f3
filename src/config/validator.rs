//! Configuration validation for desired-state files.
//!
//! Errors make the file unusable. Warnings point at declarations that parse
//! but are probably not what the author meant.

use crate::error::{ConfigError, Result};
use std::collections::HashSet;
use tracing::debug;

use super::spec::{ActionsConfig, DesiredState, LabelsConfig, PagesConfig, SettingsConfig};

const VISIBILITIES: &[&str] = &["public", "private", "internal"];
const ALLOWED_ACTIONS: &[&str] = &["all", "local_only", "selected"];
const WORKFLOW_PERMISSIONS: &[&str] = &["read", "write"];
const PAGES_BUILD_TYPES: &[&str] = &["workflow", "legacy"];

/// Validator for desired-state configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a configuration and fails on the first error.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self, config: &DesiredState) -> Result<ValidationResult> {
        let result = self.check(config);

        if let Some(first_error) = result.errors.first() {
            return Err(ConfigError::validation(
                first_error.message.clone(),
                first_error.field.clone(),
            )
            .into());
        }

        debug!("Configuration validation passed");
        Ok(result)
    }

    /// Collects every error and warning without failing.
    #[must_use]
    pub fn check(&self, config: &DesiredState) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_repository(config, &mut result);
        if let Some(settings) = &config.settings {
            Self::validate_settings(settings, &mut result);
        }
        if let Some(labels) = &config.labels {
            Self::validate_labels(labels, &mut result);
        }
        for (branch, rule) in &config.branch_protection {
            if branch.trim().is_empty() {
                result.error("branch_protection", "Branch name cannot be empty");
            } else if rule.is_empty() {
                result.warnings.push(format!(
                    "branch_protection.{branch} declares no settings; it will only be compared for existence"
                ));
            }
        }
        if let Some(env) = &config.env {
            let mut seen = HashSet::new();
            for name in &env.secrets {
                if !is_valid_env_name(name) {
                    result.error("env.secrets", format!("Invalid secret name '{name}'"));
                }
                if !seen.insert(name.as_str()) {
                    result.warnings.push(format!("Secret '{name}' is declared more than once"));
                }
            }
            for name in env.variables.keys() {
                if !is_valid_env_name(name) {
                    result.error("env.variables", format!("Invalid variable name '{name}'"));
                }
            }
        }
        if let Some(actions) = &config.actions {
            Self::validate_actions(actions, &mut result);
        }
        if let Some(pages) = &config.pages {
            Self::validate_pages(pages, &mut result);
        }

        result
    }

    fn validate_repository(config: &DesiredState, result: &mut ValidationResult) {
        let coordinates = [
            ("repository.owner", &config.repository.owner),
            ("repository.name", &config.repository.name),
        ];
        for (field, value) in coordinates {
            if value.is_empty() {
                result.error(field, "Cannot be empty");
            } else if !is_valid_repo_segment(value) {
                result.error(
                    field,
                    format!("'{value}' may only contain letters, digits, '.', '_' and '-'"),
                );
            }
        }
    }

    fn validate_settings(settings: &SettingsConfig, result: &mut ValidationResult) {
        check_enum(
            result,
            "settings.visibility",
            settings.visibility.as_deref(),
            VISIBILITIES,
        );

        if let Some(topics) = &settings.topics {
            for topic in topics {
                if topic.is_empty() || topic.len() > 50 {
                    result.error(
                        "settings.topics",
                        format!("Topic '{topic}' must be between 1 and 50 characters"),
                    );
                } else if topic.chars().any(|c| c.is_ascii_uppercase()) {
                    result
                        .warnings
                        .push(format!("Topic '{topic}' will be lowercased by GitHub"));
                }
            }
        }
    }

    fn validate_labels(labels: &LabelsConfig, result: &mut ValidationResult) {
        let mut names = HashSet::new();

        for (index, label) in labels.items.iter().enumerate() {
            let field = format!("labels.items[{index}]");

            if label.name.trim().is_empty() {
                result.error(format!("{field}.name"), "Label name cannot be empty");
            } else if !names.insert(label.name.to_lowercase()) {
                result.error(
                    format!("{field}.name"),
                    format!("Duplicate label '{}'", label.name),
                );
            }

            let color = label.color.strip_prefix('#').unwrap_or(&label.color);
            if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
                result.error(
                    format!("{field}.color"),
                    format!("'{}' is not a 6-digit hex color", label.color),
                );
            } else if label.color.starts_with('#') {
                result.warnings.push(format!(
                    "Label '{}' color has a leading '#'; it is ignored",
                    label.name
                ));
            }
        }

        if labels.replace_default && labels.items.is_empty() {
            result
                .warnings
                .push(String::from("labels.replace_default with no items deletes every label"));
        }
    }

    fn validate_actions(actions: &ActionsConfig, result: &mut ValidationResult) {
        check_enum(
            result,
            "actions.allowed_actions",
            actions.allowed_actions.as_deref(),
            ALLOWED_ACTIONS,
        );
        check_enum(
            result,
            "actions.default_workflow_permissions",
            actions.default_workflow_permissions.as_deref(),
            WORKFLOW_PERMISSIONS,
        );

        if actions.selected_actions.is_some()
            && actions.allowed_actions.as_deref() != Some("selected")
        {
            result.warnings.push(String::from(
                "actions.selected_actions only applies when allowed_actions is 'selected'",
            ));
        }
        if actions.enabled == Some(false)
            && (actions.allowed_actions.is_some() || actions.selected_actions.is_some())
        {
            result.warnings.push(String::from(
                "Actions is disabled; allowed_actions settings will have no effect",
            ));
        }
    }

    fn validate_pages(pages: &PagesConfig, result: &mut ValidationResult) {
        check_enum(
            result,
            "pages.build_type",
            pages.build_type.as_deref(),
            PAGES_BUILD_TYPES,
        );

        if let Some(path) = pages.source.as_ref().and_then(|s| s.path.as_deref())
            && path != "/"
            && path != "/docs"
        {
            result
                .error("pages.source.path", format!("'{path}' must be '/' or '/docs'"));
        }
        if pages.source.is_some() && pages.effective_build_type() == "workflow" {
            result.warnings.push(String::from(
                "pages.source is ignored for workflow builds",
            ));
        }
    }
}

fn check_enum(result: &mut ValidationResult, field: &str, value: Option<&str>, allowed: &[&str]) {
    if let Some(value) = value
        && !allowed.contains(&value)
    {
        result.error(
            field,
            format!("'{value}' is not one of: {}", allowed.join(", ")),
        );
    }
}

/// Checks an owner or repository name segment.
fn is_valid_repo_segment(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Checks a secret or variable name: letters, digits and underscores, not
/// starting with a digit or the reserved `GITHUB_` prefix.
fn is_valid_env_name(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if first.is_ascii_digit() {
        return false;
    }
    if name.to_ascii_uppercase().starts_with("GITHUB_") {
        return false;
    }
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl ValidationResult {
    fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
