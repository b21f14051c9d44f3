//! Local override source for secret and variable values.
//!
//! Secret values can never be read back from GitHub, so the only way to know
//! whether a declared secret can be set is to look it up locally. The same
//! file may also override the default value of a declared variable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Default location of the override file, relative to the repository root.
pub const DEFAULT_OVERRIDES_FILE: &str = ".github/.env";

/// Values loaded from a dotenv-style file.
#[derive(Debug, Clone, Default)]
pub struct LocalOverrides {
    values: HashMap<String, String>,
    origin: Option<PathBuf>,
}

impl LocalOverrides {
    /// Creates a source with no values.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a source from in-memory pairs.
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            origin: None,
        }
    }

    /// Loads overrides from `path`.
    ///
    /// A missing file is not an error and yields an empty source. The process
    /// environment is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!("Override file not found at: {}", path.display());
            return Ok(Self::empty());
        }

        info!("Loading local overrides from: {}", path.display());

        let parse_error = |e: dotenvy::Error| ConfigError::ParseError {
            message: format!("Failed to load override file: {e}"),
            location: Some(path.display().to_string()),
        };

        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(parse_error)? {
            let (key, value) = item.map_err(parse_error)?;
            values.insert(key, value);
        }

        debug!("Loaded {} override values", values.len());

        Ok(Self {
            values,
            origin: Some(path.to_path_buf()),
        })
    }

    /// Looks up a secret value. Empty values count as absent.
    #[must_use]
    pub fn get_secret(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Returns the override for `name`, or `fallback` when there is none.
    #[must_use]
    pub fn get_variable(&self, name: &str, fallback: &str) -> String {
        self.values
            .get(name)
            .map_or_else(|| fallback.to_string(), Clone::clone)
    }

    /// Name of the source, used in advisory messages.
    #[must_use]
    pub fn origin(&self) -> String {
        self.origin.as_ref().map_or_else(
            || String::from(DEFAULT_OVERRIDES_FILE),
            |p| p.display().to_string(),
        )
    }

    /// Number of loaded values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let overrides =
            LocalOverrides::load(temp_dir.path().join(".env")).expect("load should not fail");

        assert!(overrides.is_empty());
        assert_eq!(overrides.get_secret("API_KEY"), None);
        assert_eq!(overrides.get_variable("ENV", "dev"), "dev");
    }

    #[test]
    fn test_load_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(".env");
        std::fs::write(&path, "API_KEY=abc123\nENV=prod\nEMPTY=\n").expect("write failed");

        let overrides = LocalOverrides::load(&path).expect("load failed");

        assert_eq!(overrides.len(), 3);
        assert_eq!(overrides.get_secret("API_KEY"), Some("abc123"));
        assert_eq!(overrides.get_secret("EMPTY"), None);
        assert_eq!(overrides.get_variable("ENV", "dev"), "prod");
        assert_eq!(overrides.origin(), path.display().to_string());
    }

    #[test]
    fn test_from_pairs_origin() {
        let overrides = LocalOverrides::from_pairs([("A", "1")]);
        assert_eq!(overrides.origin(), DEFAULT_OVERRIDES_FILE);
        assert_eq!(overrides.get_variable("A", "0"), "1");
    }
}
