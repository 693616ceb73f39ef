//! Application state for the NDVI API.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use ndvi_pipeline::NdviRunner;

/// Shared application state.
pub struct AppState {
    /// Pipeline invoked once per request.
    pub runner: Arc<dyn NdviRunner>,

    /// Renders the installed Prometheus recorder.
    pub prometheus: PrometheusHandle,
}

impl AppState {
    pub fn new(runner: Arc<dyn NdviRunner>, prometheus: PrometheusHandle) -> Self {
        Self { runner, prometheus }
    }
}
