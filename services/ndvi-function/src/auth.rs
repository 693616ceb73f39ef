//! Shared-secret authorization.

use thiserror::Error;

/// Environment variable holding the expected API key.
pub const API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("API key missing from request")]
    MissingKey,

    #[error("API key does not match")]
    KeyMismatch,

    /// No secret is configured, so every request is refused.
    #[error("no API key configured")]
    NotConfigured,
}

/// Compares a caller-supplied key with the configured secret.
#[derive(Clone)]
pub struct ApiKeyGuard {
    expected: Option<String>,
}

impl ApiKeyGuard {
    pub fn new(expected: impl Into<String>) -> Self {
        let expected = expected.into();
        Self {
            expected: (!expected.is_empty()).then_some(expected),
        }
    }

    /// A guard that refuses everything.
    pub fn unconfigured() -> Self {
        Self { expected: None }
    }

    /// Read the secret from `API_KEY`.
    pub fn from_env() -> Self {
        Self::from_var(API_KEY_ENV)
    }

    pub fn from_var(name: &str) -> Self {
        match std::env::var(name) {
            Ok(key) => Self::new(key),
            Err(_) => Self::unconfigured(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }

    pub fn verify(&self, provided: Option<&str>) -> Result<(), AuthorizationError> {
        let expected = self
            .expected
            .as_deref()
            .ok_or(AuthorizationError::NotConfigured)?;
        let provided = provided.ok_or(AuthorizationError::MissingKey)?;
        if provided == expected {
            Ok(())
        } else {
            Err(AuthorizationError::KeyMismatch)
        }
    }
}

impl std::fmt::Debug for ApiKeyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyGuard")
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_key() {
        let guard = ApiKeyGuard::new("s3cret");
        assert_eq!(guard.verify(Some("s3cret")), Ok(()));
    }

    #[test]
    fn test_mismatch_and_missing() {
        let guard = ApiKeyGuard::new("s3cret");
        assert_eq!(guard.verify(Some("S3CRET")), Err(AuthorizationError::KeyMismatch));
        assert_eq!(guard.verify(Some("")), Err(AuthorizationError::KeyMismatch));
        assert_eq!(guard.verify(None), Err(AuthorizationError::MissingKey));
    }

    #[test]
    fn test_unconfigured_refuses_everything() {
        let guard = ApiKeyGuard::new("");
        assert!(!guard.is_configured());
        assert_eq!(guard.verify(Some("")), Err(AuthorizationError::NotConfigured));
        assert_eq!(guard.verify(None), Err(AuthorizationError::NotConfigured));
    }

    #[test]
    fn test_from_unset_var() {
        let guard = ApiKeyGuard::from_var("NDVI_FUNCTION_TEST_UNSET_KEY");
        assert!(!guard.is_configured());
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", ApiKeyGuard::new("s3cret"));
        assert!(!rendered.contains("s3cret"));
    }
}
