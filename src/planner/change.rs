//! A single detected difference between desired and current state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Value or item will be created.
    Add,
    /// Value will be changed in place.
    Update,
    /// Item will be removed.
    Delete,
    /// A required value is absent and cannot be resolved automatically.
    Missing,
}

/// Configuration area a change belongs to.
///
/// Declaration order is the presentation order used by the JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Repository scalar settings.
    Repo,
    /// Repository topics.
    Topics,
    /// Issue labels.
    Labels,
    /// Branch protection rules.
    BranchProtection,
    /// Actions permissions.
    Actions,
    /// GitHub Pages site.
    Pages,
    /// Actions variables (also addressable as `env`).
    #[serde(alias = "env")]
    Variables,
    /// Actions secrets.
    Secrets,
}

/// Value carried in [`Change::old`] / [`Change::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChangeValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer setting.
    Int(i64),
    /// Free-form string.
    Str(String),
    /// Ordered sequence of strings.
    List(Vec<String>),
}

/// One detected difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    change_type: ChangeType,
    category: Category,
    key: String,
    old: Option<ChangeValue>,
    new: Option<ChangeValue>,
}

impl Change {
    /// Creates an `Add` change.
    #[must_use]
    pub fn add(category: Category, key: impl Into<String>, new: impl Into<ChangeValue>) -> Self {
        Self {
            change_type: ChangeType::Add,
            category,
            key: key.into(),
            old: None,
            new: Some(new.into()),
        }
    }

    /// Creates an `Update` change.
    #[must_use]
    pub fn update(
        category: Category,
        key: impl Into<String>,
        old: impl Into<ChangeValue>,
        new: impl Into<ChangeValue>,
    ) -> Self {
        Self {
            change_type: ChangeType::Update,
            category,
            key: key.into(),
            old: Some(old.into()),
            new: Some(new.into()),
        }
    }

    /// Creates a `Delete` change.
    #[must_use]
    pub fn delete(category: Category, key: impl Into<String>, old: impl Into<ChangeValue>) -> Self {
        Self {
            change_type: ChangeType::Delete,
            category,
            key: key.into(),
            old: Some(old.into()),
            new: None,
        }
    }

    /// Creates a `Missing` change. `description` is advisory text, not a value
    /// that could be applied.
    #[must_use]
    pub fn missing(category: Category, key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            change_type: ChangeType::Missing,
            category,
            key: key.into(),
            old: None,
            new: Some(ChangeValue::Str(description.into())),
        }
    }

    /// Kind of difference.
    #[must_use]
    pub const fn change_type(&self) -> ChangeType {
        self.change_type
    }

    /// Category of the change.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Key within the category.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value, if any.
    #[must_use]
    pub const fn old(&self) -> Option<&ChangeValue> {
        self.old.as_ref()
    }

    /// Desired value (or advisory text for `Missing`), if any.
    #[must_use]
    pub const fn new_value(&self) -> Option<&ChangeValue> {
        self.new.as_ref()
    }

    /// Returns the change that would undo this one.
    ///
    /// `Missing` has no inverse and is returned unchanged.
    #[must_use]
    pub fn invert(&self) -> Self {
        let (change_type, old, new) = match self.change_type {
            ChangeType::Add => (ChangeType::Delete, self.new.clone(), None),
            ChangeType::Delete => (ChangeType::Add, None, self.old.clone()),
            ChangeType::Update => (ChangeType::Update, self.new.clone(), self.old.clone()),
            ChangeType::Missing => return self.clone(),
        };
        Self {
            change_type,
            category: self.category,
            key: self.key.clone(),
            old,
            new,
        }
    }
}

impl ChangeType {
    /// Bracketed marker used in text output.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Add => "[ADD]",
            Self::Update => "[UPDATE]",
            Self::Delete => "[DELETE]",
            Self::Missing => "[MISSING]",
        }
    }
}

impl Category {
    /// All categories in presentation order.
    pub const ALL: [Self; 8] = [
        Self::Repo,
        Self::Topics,
        Self::Labels,
        Self::BranchProtection,
        Self::Actions,
        Self::Pages,
        Self::Variables,
        Self::Secrets,
    ];

    /// Stable name used as the JSON key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Topics => "topics",
            Self::Labels => "labels",
            Self::BranchProtection => "branch_protection",
            Self::Actions => "actions",
            Self::Pages => "pages",
            Self::Variables => "variables",
            Self::Secrets => "secrets",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "repo" => Ok(Self::Repo),
            "topics" => Ok(Self::Topics),
            "labels" => Ok(Self::Labels),
            "branch_protection" | "branch-protection" => Ok(Self::BranchProtection),
            "actions" => Ok(Self::Actions),
            "pages" => Ok(Self::Pages),
            "variables" | "env" => Ok(Self::Variables),
            "secrets" => Ok(Self::Secrets),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Missing => "missing",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ChangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) if s.is_empty() => write!(f, "\"\""),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.change_type.marker(), self.key)?;
        match (&self.old, &self.new) {
            (Some(old), Some(new)) => write!(f, ": {old} -> {new}"),
            (None, Some(value)) | (Some(value), None) => write!(f, ": {value}"),
            (None, None) => Ok(()),
        }
    }
}

impl From<bool> for ChangeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ChangeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ChangeValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<String> for ChangeValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for ChangeValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<Vec<String>> for ChangeValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}
