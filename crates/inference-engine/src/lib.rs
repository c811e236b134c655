//! Cyclone Inference Engine
//!
//! Loads the pre-trained model bundle and serves wind-speed and intensity
//! predictions through a single pipeline.

mod bundle;
mod engine;

pub use bundle::{BundleError, ModelBundle, INTENSITY_MODEL_FILE, SCALER_FILE, WIND_MODEL_FILE};
pub use engine::{
    IntensityCategory, IntensityModel, Prediction, PredictionEngine, RiskLevel, WindModel,
    HIGH_WIND_KNOTS, MODERATE_WIND_KNOTS,
};

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("wind-speed regression failed: {0}")]
    Regression(String),
    #[error("intensity classification failed: {0}")]
    Classification(String),
    #[error("classifier returned out-of-range category {0}")]
    CategoryOutOfRange(i64),
    #[error("regression produced non-finite wind speed {0}")]
    NonFiniteOutput(f64),
}
