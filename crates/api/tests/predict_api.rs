//! HTTP surface tests against stub models.
//!
//! Exercises the router directly through tower's `oneshot`, with spy
//! models counting invocations so input rejection can be shown to happen
//! before any inference.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use api::{create_router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use feature_engine::{Scaler, FEATURE_DIMENSION};
use inference_engine::{InferenceError, IntensityModel, PredictionEngine, WindModel};
use serde_json::{json, Value};
use tower::ServiceExt;

struct StubWind {
    value: f64,
    calls: Arc<AtomicUsize>,
}

impl WindModel for StubWind {
    fn predict(&self, _features: &[f64; FEATURE_DIMENSION]) -> Result<f64, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value)
    }
}

struct StubIntensity {
    class: i64,
    calls: Arc<AtomicUsize>,
}

impl IntensityModel for StubIntensity {
    fn predict(&self, _features: &[f64; FEATURE_DIMENSION]) -> Result<i64, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.class)
    }
}

struct FailingWind;

impl WindModel for FailingWind {
    fn predict(&self, _features: &[f64; FEATURE_DIMENSION]) -> Result<f64, InferenceError> {
        Err(InferenceError::Regression("tensor shape mismatch".to_string()))
    }
}

/// Router over stub models plus a shared counter of model invocations
fn stub_app(wind: f64, class: i64) -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = PredictionEngine::new(
        Scaler::identity(),
        Box::new(StubWind {
            value: wind,
            calls: calls.clone(),
        }),
        Box::new(StubIntensity {
            class,
            calls: calls.clone(),
        }),
    );
    (create_router(Arc::new(AppState::new(engine))), calls)
}

fn full_request() -> Value {
    json!({
        "Latitude": 18.9,
        "Longitude": 72.8,
        "Pressure": 985,
        "Temperature": 29,
        "Humidity": 80,
        "Hour": 14,
        "Day": 17,
        "WindSpeed_lag": 55,
        "Pressure_lag": 990,
        "TempHumidityIndex": 23.2,
    })
}

async fn post_predict(app: Router, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn liveness_is_up_regardless_of_models() {
    let (app, _) = stub_app(0.0, 0);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(!bytes.is_empty());
}

#[tokio::test]
async fn predict_end_to_end() {
    let (app, _) = stub_app(70.0, 3);

    let (status, body) = post_predict(app, full_request().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "wind_speed_knots": 70.0,
            "intensity_category": 3,
            "intensity_label": "Category 3+",
            "risk_level": "HIGH",
        })
    );
}

#[tokio::test]
async fn missing_key_is_400_and_models_are_never_invoked() {
    let (app, calls) = stub_app(70.0, 3);

    let mut body = full_request();
    body.as_object_mut().unwrap().remove("Pressure");
    let (status, response) = post_predict(app, body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response,
        json!({ "error": "Missing key in input JSON: Pressure" })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn every_key_is_reported_when_missing() {
    for name in feature_engine::FEATURE_NAMES {
        let (app, _) = stub_app(50.0, 1);

        let mut body = full_request();
        body.as_object_mut().unwrap().remove(name);
        let (status, response) = post_predict(app, body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = response["error"].as_str().unwrap();
        assert!(message.contains(name), "{} not named in {}", name, message);
    }
}

#[tokio::test]
async fn non_numeric_value_is_500_with_generic_message() {
    let (app, calls) = stub_app(70.0, 3);

    let mut body = full_request();
    body.as_object_mut()
        .unwrap()
        .insert("Humidity".to_string(), json!("very humid"));
    let (status, response) = post_predict(app, body.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response, json!({ "error": "Prediction failed." }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn model_failure_is_500_with_generic_message() {
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = PredictionEngine::new(
        Scaler::identity(),
        Box::new(FailingWind),
        Box::new(StubIntensity {
            class: 1,
            calls: calls.clone(),
        }),
    );
    let app = create_router(Arc::new(AppState::new(engine)));

    let (status, response) = post_predict(app, full_request().to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response, json!({ "error": "Prediction failed." }));
}

#[tokio::test]
async fn invalid_json_body_is_400() {
    let (app, calls) = stub_app(70.0, 3);

    let (status, _) = post_predict(app, "{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_object_body_is_400() {
    let (app, calls) = stub_app(70.0, 3);

    let (status, _) = post_predict(app, json!([1, 2, 3]).to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wind_speed_is_rounded_in_the_response() {
    let (app, _) = stub_app(45.6789, 1);

    let (status, body) = post_predict(app, full_request().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wind_speed_knots"], json!(45.68));
}

#[tokio::test]
async fn risk_boundary_is_strict_over_http() {
    let (app, _) = stub_app(64.0, 2);

    let (status, body) = post_predict(app, full_request().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_level"], json!("MODERATE"));
}
