//! Metric names and recording helpers.
//!
//! Recording is a no-op until a binary installs a recorder.

use metrics::{counter, histogram};

pub const REQUESTS_TOTAL: &str = "ndvi_requests_total";
pub const REQUEST_FAILURES_TOTAL: &str = "ndvi_request_failures_total";
pub const PIPELINE_DURATION_MS: &str = "ndvi_pipeline_duration_ms";
pub const CATALOG_QUERIES_TOTAL: &str = "ndvi_catalog_queries_total";

/// Count an incoming request on `surface` (`http` or `function`).
pub fn record_request(surface: &'static str) {
    counter!(REQUESTS_TOTAL, "surface" => surface).increment(1);
}

/// Count a failed request, labelled by the stage that failed.
pub fn record_failure(surface: &'static str, stage: &'static str) {
    counter!(REQUEST_FAILURES_TOTAL, "surface" => surface, "stage" => stage).increment(1);
}

pub fn record_pipeline_duration(ms: f64) {
    histogram!(PIPELINE_DURATION_MS).record(ms);
}

pub fn record_catalog_query() {
    counter!(CATALOG_QUERIES_TOTAL).increment(1);
}
