//! Function invocation handling.

use std::collections::BTreeMap;

use ndvi_common::QueryParameters;
use ndvi_pipeline::{metrics, NdviRunner};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::auth::ApiKeyGuard;

/// Metrics label for function invocations.
pub const SURFACE: &str = "function";

pub const FORBIDDEN_BODY: &str = "Invalid API key";
pub const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Response envelope returned to the function runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    pub body: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

impl FunctionResponse {
    /// 200 with a JSON document as the body string.
    pub fn json(body: String) -> Self {
        let headers = BTreeMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        Self {
            status_code: 200,
            body,
            headers: Some(headers),
        }
    }

    pub fn forbidden() -> Self {
        Self {
            status_code: 403,
            body: FORBIDDEN_BODY.to_string(),
            headers: None,
        }
    }

    pub fn internal_error() -> Self {
        Self {
            status_code: 500,
            body: INTERNAL_ERROR_BODY.to_string(),
            headers: None,
        }
    }
}

/// Handle one invocation.
///
/// `event` is a flat object carrying `api_key` alongside the query
/// parameters. The key is checked before anything else. Failures after
/// authorization are logged and reported with a generic 500 body.
#[instrument(skip_all)]
pub async fn handle(
    event: &Value,
    guard: &ApiKeyGuard,
    runner: &dyn NdviRunner,
) -> FunctionResponse {
    metrics::record_request(SURFACE);

    let provided = event.get("api_key").and_then(Value::as_str);
    if let Err(e) = guard.verify(provided) {
        warn!(reason = %e, "Rejected invocation");
        metrics::record_failure(SURFACE, "authorization");
        return FunctionResponse::forbidden();
    }

    let params = match QueryParameters::from_json_value(event.clone()) {
        Ok(params) => params,
        Err(e) => {
            error!(stage = "validation", error = %e, "Invalid invocation parameters");
            metrics::record_failure(SURFACE, "validation");
            return FunctionResponse::internal_error();
        }
    };

    let response = match runner.run(&params).await {
        Ok(response) => response,
        Err(e) => {
            error!(stage = e.stage(), error = %e, "NDVI invocation failed");
            metrics::record_failure(SURFACE, e.stage());
            return FunctionResponse::internal_error();
        }
    };

    match serde_json::to_string(&response) {
        Ok(body) => {
            info!(year = %params.year, "NDVI invocation complete");
            FunctionResponse::json(body)
        }
        Err(e) => {
            error!(stage = "serialization", error = %e, "Failed to encode response");
            metrics::record_failure(SURFACE, "serialization");
            FunctionResponse::internal_error()
        }
    }
}
