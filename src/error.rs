//! Error types for the reconciliation engine.
//!
//! Errors are split by the layer that raises them: configuration loading,
//! the GitHub gateway, and local I/O. Gateway errors form a closed set so
//! that comparators can match on the two absence signals
//! ([`GatewayError::BranchNotProtected`] and [`GatewayError::PagesNotEnabled`])
//! without relying on string inspection.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for `gh_reconcile`.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Gateway (GitHub API) errors.
    #[error("GitHub API error: {0}")]
    Gateway(#[from] GatewayError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// Environment variable is missing.
    #[error("Missing environment variable: {name}")]
    MissingEnvVar {
        /// Name of the missing variable.
        name: String,
    },
}

/// Errors raised by a gateway while reading current state.
///
/// `BranchNotProtected` and `PagesNotEnabled` are not failures from the
/// planner's point of view: they describe a valid current state and are
/// translated into `Add` changes by the comparators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The branch exists but carries no protection rule.
    #[error("Branch not protected: {branch}")]
    BranchNotProtected {
        /// Branch name.
        branch: String,
    },

    /// GitHub Pages is not enabled for the repository.
    #[error("GitHub Pages is not enabled")]
    PagesNotEnabled,

    /// The token lacks permission for the requested resource.
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Message returned by the API.
        message: String,
    },

    /// Rate limited.
    #[error("GitHub API rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The requested resource does not exist.
    #[error("Resource not found: {resource} ({message})")]
    NotFound {
        /// Request path.
        resource: String,
        /// Message returned by the API.
        message: String,
    },

    /// Network error.
    #[error("Network error communicating with GitHub: {message}")]
    NetworkError {
        /// Description of the network error.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("Invalid response from GitHub API: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },

    /// Any other non-success response.
    #[error("GitHub API request failed: {status} - {message}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for gateway reads.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

impl Error {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl GatewayError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::NetworkError { .. })
    }

    /// Returns the suggested retry delay in seconds, if applicable.
    #[must_use]
    pub const fn retry_delay_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            Self::NetworkError { .. } => Some(1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(GatewayError::RateLimited { retry_after_secs: 3 }.is_retryable());
        assert_eq!(
            GatewayError::RateLimited { retry_after_secs: 3 }.retry_delay_secs(),
            Some(3)
        );
        assert!(!GatewayError::PermissionDenied {
            message: String::from("nope")
        }
        .is_retryable());
    }

    #[test]
    fn test_gateway_error_converts() {
        let err: Error = GatewayError::PagesNotEnabled.into();
        assert!(matches!(err, Error::Gateway(GatewayError::PagesNotEnabled)));
    }
}
