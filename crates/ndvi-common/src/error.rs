//! Validation errors for incoming query parameters.

use thiserror::Error;

/// Result type alias using ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Errors raised while building [`crate::QueryParameters`] from caller input.
///
/// These are detected before any network activity takes place.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Request body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            ValidationError::InvalidJson(err.to_string())
        } else {
            ValidationError::InvalidParameters(err.to_string())
        }
    }
}
