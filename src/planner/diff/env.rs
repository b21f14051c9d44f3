//! Actions secrets and variables.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::LocalOverrides;
use crate::planner::change::{Category, Change};

/// Placeholder shown as the old value of a deleted secret.
const HIDDEN_SECRET: &str = "(value hidden)";

/// A variable as it exists on the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentVariable {
    /// Variable name.
    pub name: String,
    /// Current value.
    pub value: String,
}

/// Compares declared secret names with the names present on the repository.
///
/// Secret values cannot be read back, so existing secrets are never updated.
/// A declared secret that does not exist is an `Add` when the override
/// source can supply its value and `Missing` otherwise. With `sync_delete`,
/// secrets present on the repository but not declared are deleted.
#[must_use]
pub fn compare_secrets(
    current: &[String],
    desired: &[String],
    overrides: &LocalOverrides,
    sync_delete: bool,
) -> Vec<Change> {
    let mut changes = Vec::new();
    let existing: HashSet<&str> = current.iter().map(String::as_str).collect();
    let origin = overrides.origin();

    for name in desired {
        if existing.contains(name.as_str()) {
            continue;
        }
        if overrides.get_secret(name).is_some() {
            changes.push(Change::add(
                Category::Secrets,
                name,
                format!("(will be set from {origin})"),
            ));
        } else {
            changes.push(Change::missing(
                Category::Secrets,
                name,
                format!("not found in {origin}, will prompt"),
            ));
        }
    }

    if sync_delete {
        let declared: HashSet<&str> = desired.iter().map(String::as_str).collect();
        for name in current {
            if !declared.contains(name.as_str()) {
                changes.push(Change::delete(Category::Secrets, name, HIDDEN_SECRET));
            }
        }
    }

    changes
}

/// Compares declared variables with the repository's variables.
///
/// The effective desired value is the override value when one exists, else
/// the declared default. With `sync_delete`, undeclared variables are
/// deleted and carry their current value as `old`.
#[must_use]
pub fn compare_variables(
    current: &[CurrentVariable],
    desired: &BTreeMap<String, String>,
    overrides: &LocalOverrides,
    sync_delete: bool,
) -> Vec<Change> {
    let mut changes = Vec::new();
    let existing: HashMap<&str, &str> = current
        .iter()
        .map(|v| (v.name.as_str(), v.value.as_str()))
        .collect();

    for (name, default) in desired {
        let value = overrides.get_variable(name, default);
        match existing.get(name.as_str()) {
            None => changes.push(Change::add(Category::Variables, name, value)),
            Some(&current_value) if current_value != value => {
                changes.push(Change::update(Category::Variables, name, current_value, value));
            }
            Some(_) => {}
        }
    }

    if sync_delete {
        for variable in current {
            if !desired.contains_key(&variable.name) {
                changes.push(Change::delete(
                    Category::Variables,
                    &variable.name,
                    variable.value.as_str(),
                ));
            }
        }
    }

    changes
}
