//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use portal_api::ApiError;

use crate::validation::FieldErrors;

/// Core layer error type
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// API error (network, timeout, non-2xx, token retrieval)
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Form validation failed; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Entity not present in local state
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation rejected locally (e.g., removing the default payment source)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No signed-in user
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Persisted auth state could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.), used for log levels.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::NotFound(_)
            | Self::Conflict(_)
            | Self::NotAuthenticated => true,
            Self::Api(e) => e.is_expected(),
            Self::Storage(_) | Self::Config(_) => false,
        }
    }

    /// Field errors, when this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
