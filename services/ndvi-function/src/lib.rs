//! Serverless entry point for NDVI statistics.
//!
//! A function runtime hands [`handle`] a flat JSON event holding an
//! `api_key` and the query parameters; it returns a `statusCode`/`body`
//! envelope.

pub mod auth;
pub mod handler;

pub use auth::{ApiKeyGuard, AuthorizationError, API_KEY_ENV};
pub use handler::{handle, FunctionResponse, FORBIDDEN_BODY, INTERNAL_ERROR_BODY};
