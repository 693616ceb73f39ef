//! Invocation tests against a mock pipeline.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use ndvi_common::{Month, QueryParameters};
use ndvi_function::{handle, ApiKeyGuard, FunctionResponse, FORBIDDEN_BODY, INTERNAL_ERROR_BODY};
use ndvi_pipeline::{
    AnnualStatistics, MonthlyStatistics, NdviResponse, NdviRunner, PipelineError, StatisticsError,
};
use serde_json::{json, Value};

#[derive(Default)]
struct MockRunner {
    fail: bool,
    calls: AtomicUsize,
    seen: Mutex<Vec<QueryParameters>>,
}

#[async_trait]
impl NdviRunner for MockRunner {
    async fn run(&self, params: &QueryParameters) -> Result<NdviResponse, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(params.clone());
        if self.fail {
            return Err(StatisticsError::NoValidPixels {
                month: Month::January,
            }
            .into());
        }

        let by_month: BTreeMap<Month, MonthlyStatistics> = Month::ALL
            .into_iter()
            .map(|month| {
                (
                    month,
                    MonthlyStatistics {
                        mean_ndvi: 0.5,
                        max_ndvi: 0.9,
                        min_ndvi: 0.1,
                        std_ndvi: 0.2,
                        harvestable_area_percentage: 60.0,
                    },
                )
            })
            .collect();
        let overall = AnnualStatistics::from_months(&by_month).unwrap();
        Ok(NdviResponse::new(params, by_month, overall))
    }
}

fn guard() -> ApiKeyGuard {
    ApiKeyGuard::new("test-key")
}

#[tokio::test]
async fn test_valid_key_returns_json_body() {
    let runner = MockRunner::default();
    let event = json!({
        "api_key": "test-key",
        "latitude": 45.0,
        "longitude": -93.0,
        "buffer": 2.0,
        "year": "2020"
    });

    let response = handle(&event, &guard(), &runner).await;

    assert_eq!(response.status_code, 200);
    let headers = response.headers.as_ref().unwrap();
    assert_eq!(headers["Content-Type"], "application/json");

    // The body is itself a JSON document encoded as a string.
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["latitude"], 45.0);
    assert_eq!(body["longitude"], -93.0);
    assert_eq!(body["buffer"], 2.0);
    assert_eq!(body["year"], "2020");
    assert_eq!(body["ndvi_stats_by_month"].as_object().unwrap().len(), 4);
    assert_eq!(body["overall_stats"]["peak_ndvi_month"], "January");

    let seen = runner.seen.lock().unwrap();
    assert_eq!(seen[0].latitude, 45.0);
    assert_eq!(seen[0].year, "2020");
}

#[tokio::test]
async fn test_key_only_event_uses_defaults() {
    let runner = MockRunner::default();
    let response = handle(&json!({"api_key": "test-key"}), &guard(), &runner).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(runner.seen.lock().unwrap()[0], QueryParameters::default());
}

#[tokio::test]
async fn test_wrong_or_missing_key_is_forbidden() {
    let events = [
        json!({"api_key": "wrong", "latitude": 40.0}),
        json!({"latitude": 40.0}),
        json!({"api_key": null}),
        json!({"api_key": 12345}),
        json!([1, 2, 3]),
    ];

    for event in events {
        let runner = MockRunner::default();
        let response = handle(&event, &guard(), &runner).await;

        assert_eq!(
            response,
            FunctionResponse {
                status_code: 403,
                body: FORBIDDEN_BODY.to_string(),
                headers: None,
            },
            "{}",
            event
        );
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_unconfigured_secret_is_forbidden() {
    let runner = MockRunner::default();
    let response = handle(&json!({"api_key": ""}), &ApiKeyGuard::unconfigured(), &runner).await;

    assert_eq!(response.status_code, 403);
    assert_eq!(response.body, "Invalid API key");
    assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_pipeline_failure_is_generic_500() {
    let runner = MockRunner {
        fail: true,
        ..Default::default()
    };
    let response = handle(&json!({"api_key": "test-key"}), &guard(), &runner).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body, INTERNAL_ERROR_BODY);
    assert!(response.headers.is_none());
}

#[tokio::test]
async fn test_invalid_parameters_after_auth_is_generic_500() {
    let runner = MockRunner::default();
    let event = json!({"api_key": "test-key", "latitude": "north"});

    let response = handle(&event, &guard(), &runner).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body, "Internal server error");
    assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_envelope_wire_format() {
    let json = serde_json::to_string(&FunctionResponse::forbidden()).unwrap();
    assert_eq!(json, r#"{"statusCode":403,"body":"Invalid API key"}"#);
}
