//! HTTP handlers.

mod health;
mod ndvi;

pub use health::{health_handler, metrics_handler, HealthResponse};
pub use ndvi::{get_ndvi_handler, ErrorDetail};

/// Metrics label for requests arriving over HTTP.
pub const SURFACE: &str = "http";
