//! GitHub Pages site.

use crate::config::PagesConfig;
use crate::planner::change::{Category, Change};

use super::diff_field;

/// Current Pages configuration. `build_type` is empty when the API returned
/// `null` or omitted it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentPages {
    /// `workflow` or `legacy`.
    pub build_type: String,
    /// Publishing source, when the API reports one.
    pub source: Option<CurrentPagesSource>,
}

/// Current publishing source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentPagesSource {
    /// Source branch.
    pub branch: String,
    /// Source directory.
    pub path: String,
}

/// Summary used when Pages has to be enabled.
#[must_use]
pub fn summarize_pages(desired: &PagesConfig) -> String {
    let mut summary = format!("build_type={}", desired.effective_build_type());
    if let Some(source) = &desired.source {
        if let Some(branch) = &source.branch {
            summary.push_str(&format!(", source.branch={branch}"));
        }
        if let Some(path) = &source.path {
            summary.push_str(&format!(", source.path={path}"));
        }
    }
    summary
}

/// Compares an enabled Pages site with the declared one.
///
/// Source fields are only compared when both sides describe a source.
#[must_use]
pub fn compare_pages(current: &CurrentPages, desired: &PagesConfig) -> Vec<Change> {
    let mut changes = Vec::new();

    diff_field(
        &mut changes,
        Category::Pages,
        "build_type",
        &current.build_type,
        desired.build_type.as_ref(),
    );

    if let (Some(desired_source), Some(current_source)) = (&desired.source, &current.source) {
        diff_field(
            &mut changes,
            Category::Pages,
            "source.branch",
            &current_source.branch,
            desired_source.branch.as_ref(),
        );
        diff_field(
            &mut changes,
            Category::Pages,
            "source.path",
            &current_source.path,
            desired_source.path.as_ref(),
        );
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PagesSourceConfig;
    use crate::planner::change::ChangeValue;

    fn legacy_source(branch: &str, path: &str) -> CurrentPages {
        CurrentPages {
            build_type: String::from("legacy"),
            source: Some(CurrentPagesSource {
                branch: branch.to_string(),
                path: path.to_string(),
            }),
        }
    }

    #[test]
    fn test_build_type_from_empty() {
        let desired = PagesConfig {
            build_type: Some(String::from("workflow")),
            source: None,
        };

        let changes = compare_pages(&CurrentPages::default(), &desired);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].key(), "build_type");
        assert_eq!(changes[0].old(), Some(&ChangeValue::from("")));
    }

    #[test]
    fn test_source_fields_compared_independently() {
        let desired = PagesConfig {
            build_type: None,
            source: Some(PagesSourceConfig {
                branch: Some(String::from("main")),
                path: Some(String::from("/docs")),
            }),
        };

        let changes = compare_pages(&legacy_source("gh-pages", "/docs"), &desired);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].key(), "source.branch");
    }

    #[test]
    fn test_source_skipped_when_current_has_none() {
        let desired = PagesConfig {
            build_type: Some(String::from("workflow")),
            source: Some(PagesSourceConfig {
                branch: Some(String::from("main")),
                path: None,
            }),
        };
        let current = CurrentPages {
            build_type: String::from("workflow"),
            source: None,
        };

        assert!(compare_pages(&current, &desired).is_empty());
    }

    #[test]
    fn test_summary() {
        assert_eq!(summarize_pages(&PagesConfig::default()), "build_type=workflow");

        let desired = PagesConfig {
            build_type: Some(String::from("legacy")),
            source: Some(PagesSourceConfig {
                branch: Some(String::from("gh-pages")),
                path: Some(String::from("/")),
            }),
        };
        assert_eq!(
            summarize_pages(&desired),
            "build_type=legacy, source.branch=gh-pages, source.path=/"
        );
    }
}
