//! `POST /get_ndvi`.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use ndvi_common::QueryParameters;
use ndvi_pipeline::metrics;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument, warn};

use super::SURFACE;
use crate::state::AppState;

/// Error body: `{"detail": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorDetail { detail })).into_response()
}

/// Compute NDVI statistics for the location and year in the JSON body.
///
/// Malformed bodies are rejected with 422 before the pipeline runs. Pipeline
/// failures return 500 with the error message.
#[instrument(skip_all)]
pub async fn get_ndvi_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Response {
    metrics::record_request(SURFACE);

    let params = match QueryParameters::from_json_slice(&body) {
        Ok(params) => params,
        Err(e) => {
            warn!(error = %e, "Rejected request body");
            metrics::record_failure(SURFACE, "validation");
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
        }
    };

    match state.runner.run(&params).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!(stage = e.stage(), error = %e, "NDVI request failed");
            metrics::record_failure(SURFACE, e.stage());
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
