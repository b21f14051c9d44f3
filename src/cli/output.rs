//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::ValidationResult;
use crate::planner::{Category, Change, ChangeCounts, ChangeType, ChangeValue, Plan};
use crate::reconciler::CategoryFailure;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Per-category count row for table display.
#[derive(Tabled)]
struct CategoryCountRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Add")]
    add: usize,
    #[tabled(rename = "Update")]
    update: usize,
    #[tabled(rename = "Delete")]
    delete: usize,
    #[tabled(rename = "Missing")]
    missing: usize,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a plan for display.
    #[must_use]
    pub fn format_plan(&self, plan: &Plan) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&PlanJson::from(plan)).unwrap_or_default()
            }
            OutputFormat::Text => Self::format_plan_text(plan),
        }
    }

    /// Formats a plan as text.
    fn format_plan_text(plan: &Plan) -> String {
        if plan.is_empty() {
            return format!(
                "{} No changes. Repository matches configuration.\n",
                "✓".green()
            );
        }

        let mut output = String::new();

        for category in plan.categories() {
            let _ = writeln!(output, "\n{}", category.as_str().bold());
            for change in plan.iter().filter(|c| c.category() == category) {
                let _ = writeln!(output, "  {}", Self::format_change(change));
            }
        }

        let rows: Vec<CategoryCountRow> = plan
            .categories()
            .into_iter()
            .map(|category| {
                let counts = plan.filter_by_category(category).count_by_type();
                CategoryCountRow {
                    category: category.to_string(),
                    add: counts.add,
                    update: counts.update,
                    delete: counts.delete,
                    missing: counts.missing,
                }
            })
            .collect();
        output.push('\n');
        output.push_str(&Table::new(rows).to_string());
        output.push('\n');

        let counts = plan.count_by_type();
        let _ = writeln!(
            output,
            "\nPlan: {} to add, {} to update, {} to delete, {} missing",
            counts.add.to_string().green(),
            counts.update.to_string().yellow(),
            counts.delete.to_string().red(),
            counts.missing.to_string().magenta()
        );

        if plan.has_missing_secrets() || plan.has_missing_variables() {
            let _ = writeln!(
                output,
                "{} Missing values will be prompted for when applying.",
                "⚠".yellow()
            );
        }

        output
    }

    /// Formats one change line with a colored marker.
    fn format_change(change: &Change) -> String {
        let marker = change.change_type().marker();
        let marker = match change.change_type() {
            ChangeType::Add => marker.green(),
            ChangeType::Update => marker.yellow(),
            ChangeType::Delete => marker.red(),
            ChangeType::Missing => marker.magenta(),
        };

        match (change.old(), change.new_value()) {
            (Some(old), Some(new)) => format!("{marker} {}: {old} -> {new}", change.key()),
            (None, Some(value)) | (Some(value), None) => {
                format!("{marker} {}: {value}", change.key())
            }
            (None, None) => format!("{marker} {}", change.key()),
        }
    }

    /// Formats category failures for stderr.
    #[must_use]
    pub fn format_failures(&self, failures: &[CategoryFailure]) -> String {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<_> = failures
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "category": f.comparator,
                            "error": f.error.to_string(),
                        })
                    })
                    .collect();
                serde_json::to_string_pretty(&serde_json::json!({ "failures": json }))
                    .unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = String::new();
                for failure in failures {
                    let _ = writeln!(output, "{} {failure}", "✗".red());
                }
                output
            }
        }
    }

    /// Formats a validation result.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        let warnings: &[String] = if show_warnings { &result.warnings } else { &[] };

        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": result.is_valid(),
                    "errors": result.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "warnings": warnings,
                });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = String::new();

                if result.is_valid() {
                    let _ = writeln!(output, "{} Configuration is valid!", "✓".green());
                } else {
                    let _ = writeln!(
                        output,
                        "{} Configuration has {} error(s):",
                        "✗".red(),
                        result.error_count()
                    );
                    for error in &result.errors {
                        let _ = writeln!(output, "  - {error}");
                    }
                }

                if !warnings.is_empty() {
                    let _ = writeln!(output, "\n{} Warnings:", "⚠".yellow());
                    for warning in warnings {
                        let _ = writeln!(output, "  - {warning}");
                    }
                } else if !show_warnings && result.warning_count() > 0 {
                    let _ = writeln!(
                        output,
                        "{} warning(s) hidden, use --warnings to show them",
                        result.warning_count()
                    );
                }

                output
            }
        }
    }
}

// JSON serialization helpers

#[derive(Serialize)]
struct PlanJson<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    repo: Vec<ChangeJson<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    topics: Vec<ChangeJson<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<ChangeJson<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    branch_protection: Vec<ChangeJson<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    actions: Vec<ChangeJson<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pages: Vec<ChangeJson<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    variables: Vec<ChangeJson<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    secrets: Vec<ChangeJson<'a>>,
    summary: ChangeCounts,
}

#[derive(Serialize)]
struct ChangeJson<'a> {
    #[serde(rename = "type")]
    change_type: ChangeType,
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    old: Option<&'a ChangeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new: Option<&'a ChangeValue>,
}

impl<'a> From<&'a Plan> for PlanJson<'a> {
    fn from(plan: &'a Plan) -> Self {
        let entries = |category: Category| -> Vec<ChangeJson<'a>> {
            plan.iter()
                .filter(|c| c.category() == category)
                .map(|c| ChangeJson {
                    change_type: c.change_type(),
                    key: c.key(),
                    old: c.old(),
                    new: c.new_value(),
                })
                .collect()
        };

        Self {
            repo: entries(Category::Repo),
            topics: entries(Category::Topics),
            labels: entries(Category::Labels),
            branch_protection: entries(Category::BranchProtection),
            actions: entries(Category::Actions),
            pages: entries(Category::Pages),
            variables: entries(Category::Variables),
            secrets: entries(Category::Secrets),
            summary: plan.count_by_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Change;
    use serde_json::{Value, json};

    fn sample() -> Plan {
        let mut plan = Plan::new();
        plan.add(Change::update(Category::Repo, "description", "", "Widget"));
        plan.add(Change::add(
            Category::Labels,
            "bug",
            "color=d73a4a, description=Bug report",
        ));
        plan.add(Change::update(
            Category::BranchProtection,
            "main.required_reviews",
            1_u32,
            2_u32,
        ));
        plan.add(Change::missing(
            Category::Secrets,
            "API_KEY",
            "not found in .github/.env, will prompt",
        ));
        plan
    }

    #[test]
    fn test_json_shape() {
        let output = OutputFormatter::new(OutputFormat::Json).format_plan(&sample());
        let value: Value = serde_json::from_str(&output).expect("valid json");

        assert_eq!(
            value,
            json!({
                "repo": [{"type": "update", "key": "description", "old": "", "new": "Widget"}],
                "labels": [{
                    "type": "add",
                    "key": "bug",
                    "new": "color=d73a4a, description=Bug report"
                }],
                "branch_protection": [{
                    "type": "update",
                    "key": "main.required_reviews",
                    "old": 1,
                    "new": 2
                }],
                "secrets": [{
                    "type": "missing",
                    "key": "API_KEY",
                    "new": "not found in .github/.env, will prompt"
                }],
                "summary": {"add": 1, "update": 2, "delete": 0, "missing": 1}
            })
        );
    }

    #[test]
    fn test_empty_plan_json_has_only_summary() {
        let output = OutputFormatter::new(OutputFormat::Json).format_plan(&Plan::new());
        let value: Value = serde_json::from_str(&output).expect("valid json");

        assert_eq!(
            value,
            json!({"summary": {"add": 0, "update": 0, "delete": 0, "missing": 0}})
        );
    }

    #[test]
    fn test_text_output() {
        colored::control::set_override(false);

        let output = OutputFormatter::new(OutputFormat::Text).format_plan(&sample());

        assert!(output.contains("[UPDATE] description: \"\" -> Widget"));
        assert!(output.contains("[ADD] bug: color=d73a4a, description=Bug report"));
        assert!(output.contains("[MISSING] API_KEY: not found"));
        assert!(output.contains("Plan: 1 to add, 2 to update, 0 to delete, 1 missing"));

        let empty = OutputFormatter::new(OutputFormat::Text).format_plan(&Plan::new());
        assert!(empty.contains("No changes. Repository matches configuration."));
    }
}
