//! Predict Route

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::AppState;
use feature_engine::{FeatureError, FeatureVector};
use inference_engine::Prediction;

/// Error response for the predict endpoint.
///
/// Input problems are reported with their cause; anything that fails during
/// scaling or inference is collapsed to a fixed generic message so internal
/// causes never reach the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller sent a malformed request
    #[error("{0}")]
    BadRequest(String),
    /// Prediction pipeline failed
    #[error("Prediction failed.")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Serve a prediction for one feature payload
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest("Request body must be a JSON object".to_string())
    })?;

    let features = match FeatureVector::from_request(&body) {
        Ok(features) => features,
        Err(err @ (FeatureError::NotAnObject | FeatureError::MissingKey(_))) => {
            warn!("Rejected prediction input: {}", err);
            return Err(ApiError::BadRequest(err.to_string()));
        }
        Err(err) => {
            // Present-but-unusable values fail the same way any other
            // inference failure does; the caller only sees the generic
            // message.
            warn!("Prediction input unusable: {}", err);
            return Err(ApiError::Internal);
        }
    };

    match state.engine.predict(&features) {
        Ok(prediction) => Ok(Json(prediction)),
        Err(err) => {
            error!("Prediction failed: {}", err);
            Err(ApiError::Internal)
        }
    }
}
