//! Tests for the NDVI HTTP handlers and router.
//!
//! The pipeline is replaced by a mock runner; no network access is needed.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::extract::Extension;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use metrics_exporter_prometheus::PrometheusBuilder;
use ndvi_api::handlers::{get_ndvi_handler, ErrorDetail, HealthResponse};
use ndvi_api::state::AppState;
use ndvi_common::{Month, QueryParameters};
use ndvi_pipeline::{
    AnnualStatistics, MonthlyStatistics, NdviResponse, NdviRunner, PipelineError, StatisticsError,
};
use serde_json::Value;
use tower::ServiceExt;

// ============================================================================
// Mock runner
// ============================================================================

#[derive(Default)]
struct MockRunner {
    fail: bool,
    calls: AtomicUsize,
    seen: Mutex<Vec<QueryParameters>>,
}

impl MockRunner {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

fn canned_response(params: &QueryParameters) -> NdviResponse {
    let by_month: BTreeMap<Month, MonthlyStatistics> = Month::ALL
        .into_iter()
        .zip([0.5, 0.6, 0.3, 0.45])
        .map(|(month, mean)| {
            (
                month,
                MonthlyStatistics {
                    mean_ndvi: mean,
                    max_ndvi: mean,
                    min_ndvi: mean,
                    std_ndvi: 0.0,
                    harvestable_area_percentage: if mean > 0.4 { 100.0 } else { 0.0 },
                },
            )
        })
        .collect();
    let overall = AnnualStatistics::from_months(&by_month).unwrap();
    NdviResponse::new(params, by_month, overall)
}

#[async_trait]
impl NdviRunner for MockRunner {
    async fn run(&self, params: &QueryParameters) -> Result<NdviResponse, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(params.clone());
        if self.fail {
            return Err(StatisticsError::NoValidPixels {
                month: Month::October,
            }
            .into());
        }
        Ok(canned_response(params))
    }
}

fn state(runner: Arc<MockRunner>) -> Arc<AppState> {
    // Not installed globally, so tests can build as many as they like.
    let prometheus = PrometheusBuilder::new().build_recorder().handle();
    Arc::new(AppState::new(runner, prometheus))
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Handler tests
// ============================================================================

#[tokio::test]
async fn test_get_ndvi_success() {
    let runner = Arc::new(MockRunner::default());
    let body =
        Bytes::from(r#"{"latitude": 40.0, "longitude": -100.0, "buffer": 0.5, "year": "2022"}"#);

    let response = get_ndvi_handler(Extension(state(runner.clone())), body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["latitude"], 40.0);
    assert_eq!(json["longitude"], -100.0);
    assert_eq!(json["buffer"], 0.5);
    assert_eq!(json["year"], "2022");
    assert_eq!(json["overall_stats"]["peak_ndvi_month"], "April");
    assert_eq!(json["overall_stats"]["lowest_ndvi_month"], "July");
    assert_eq!(json["ndvi_stats_by_month"].as_object().unwrap().len(), 4);
}

#[tokio::test]
async fn test_get_ndvi_empty_body_uses_defaults() {
    let runner = Arc::new(MockRunner::default());

    let response = get_ndvi_handler(Extension(state(runner.clone())), Bytes::new()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(runner.seen.lock().unwrap()[0], QueryParameters::default());
}

#[tokio::test]
async fn test_get_ndvi_malformed_body_is_422() {
    for body in [r#"{"latitude": "north"}"#, "not json", "[1, 2]"] {
        let runner = Arc::new(MockRunner::default());
        let response =
            get_ndvi_handler(Extension(state(runner.clone())), Bytes::from(body)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
        let json = body_json(response).await;
        assert!(json["detail"].as_str().is_some_and(|d| !d.is_empty()));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_get_ndvi_pipeline_failure_is_500_with_detail() {
    let runner = Arc::new(MockRunner::failing());

    let response = get_ndvi_handler(Extension(state(runner)), Bytes::from("{}")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let detail: ErrorDetail = serde_json::from_slice(&bytes).unwrap();
    assert!(detail.detail.contains("October"), "{}", detail.detail);
}

// ============================================================================
// Router tests
// ============================================================================

#[tokio::test]
async fn test_router_serves_get_ndvi() {
    let app = ndvi_api::router(state(Arc::new(MockRunner::default())));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/get_ndvi")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"year": 2020}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["year"], "2020");
}

#[tokio::test]
async fn test_router_rejects_get_on_get_ndvi() {
    let app = ndvi_api::router(state(Arc::new(MockRunner::default())));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/get_ndvi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_router_health() {
    let app = ndvi_api::router(state(Arc::new(MockRunner::default())));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_router_metrics_is_text() {
    let app = ndvi_api::router(state(Arc::new(MockRunner::default())));

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}
