//! NDVI API Service Library
//!
//! HTTP surface for the NDVI statistics pipeline: `POST /get_ndvi` plus
//! health and Prometheus metrics endpoints.

pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the application router with its middleware layers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get_ndvi", post(handlers::get_ndvi_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
