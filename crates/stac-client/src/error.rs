//! Error types for catalog access.

use thiserror::Error;

/// Errors produced while searching the catalog or signing assets.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport-level failure reaching the catalog.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The catalog response could not be parsed.
    #[error("invalid catalog response: {0}")]
    InvalidResponse(String),

    /// Asset href signing failed.
    #[error("signing error: {0}")]
    Signing(String),

    /// A required search returned no items.
    #[error("no items found in collection {collection} for {datetime}")]
    NoItems { collection: String, datetime: String },

    /// A search datetime key could not be turned into an interval.
    #[error("invalid search datetime '{0}', expected YYYY-MM")]
    InvalidDatetime(String),

    /// Configuration could not be applied.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Create an InvalidResponse error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a Signing error.
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
