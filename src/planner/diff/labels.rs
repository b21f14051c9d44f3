//! Issue labels.

use std::collections::{HashMap, HashSet};

use crate::config::LabelsConfig;
use crate::planner::change::{Category, Change};

/// A label as it exists on the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentLabel {
    /// Label name.
    pub name: String,
    /// Hex color.
    pub color: String,
    /// Description, empty when unset.
    pub description: String,
}

/// Renders a label's comparable fields, e.g. `color=d73a4a, description=Bug report`.
#[must_use]
pub fn format_label(color: &str, description: &str) -> String {
    format!("color={color}, description={description}")
}

fn normalize_color(color: &str) -> String {
    color.trim().trim_start_matches('#').to_ascii_lowercase()
}

fn normalize_description(description: Option<&str>) -> &str {
    description.unwrap_or_default().trim()
}

/// Compares declared labels with the repository's labels.
///
/// Declared labels are visited in declaration order: missing ones yield
/// `Add`, ones whose color or description differ yield `Update`. Names match
/// case-insensitively, as on GitHub. Labels that
/// exist only on the repository are deleted only when
/// [`LabelsConfig::replace_default`] is set.
#[must_use]
pub fn compare_labels(current: &[CurrentLabel], desired: &LabelsConfig) -> Vec<Change> {
    let mut changes = Vec::new();
    let current_by_name: HashMap<String, &CurrentLabel> =
        current.iter().map(|l| (l.name.to_lowercase(), l)).collect();

    for label in &desired.items {
        let color = normalize_color(&label.color);
        let description = normalize_description(label.description.as_deref());

        match current_by_name.get(&label.name.to_lowercase()) {
            None => changes.push(Change::add(
                Category::Labels,
                &label.name,
                format_label(&color, description),
            )),
            Some(existing) => {
                let existing_color = normalize_color(&existing.color);
                let existing_description = normalize_description(Some(existing.description.as_str()));

                if existing_color != color || existing_description != description {
                    changes.push(Change::update(
                        Category::Labels,
                        &label.name,
                        format_label(&existing_color, existing_description),
                        format_label(&color, description),
                    ));
                }
            }
        }
    }

    if desired.replace_default {
        let declared: HashSet<String> =
            desired.items.iter().map(|l| l.name.to_lowercase()).collect();
        for existing in current {
            if !declared.contains(&existing.name.to_lowercase()) {
                changes.push(Change::delete(
                    Category::Labels,
                    &existing.name,
                    format_label(
                        &normalize_color(&existing.color),
                        normalize_description(Some(existing.description.as_str())),
                    ),
                ));
            }
        }
    }

    changes
}
