//! Model Bundle Loading
//!
//! The bundle is a directory of three artifacts under fixed names,
//! produced by the external training process: the fitted scaler
//! parameters as JSON, and the two models as ONNX graphs.

use crate::engine::{IntensityModel, WindModel};
use crate::InferenceError;
use feature_engine::{Scaler, FEATURE_DIMENSION};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tract_onnx::prelude::*;
use tracing::info;

/// Fitted scaler parameters artifact
pub const SCALER_FILE: &str = "scaler.json";
/// Wind-speed regression model artifact
pub const WIND_MODEL_FILE: &str = "wind_model.onnx";
/// Intensity classification model artifact; its first output must be the
/// integer class label
pub const INTENSITY_MODEL_FILE: &str = "intensity_model.onnx";

type RunnableOnnxModel =
    SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Errors while loading the bundle. All of them are fatal at startup; the
/// process must not reach serving state without a complete bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("cannot read bundle artifact {}: {source}", .path.display())]
    ArtifactUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scaler parameters in {} are malformed: {source}", .path.display())]
    ScalerMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("scaler parameters rejected: {0}")]
    ScalerRejected(#[from] feature_engine::FeatureError),
    #[error("cannot load model {}: {detail}", .path.display())]
    ModelLoad { path: PathBuf, detail: String },
}

/// On-disk scaler parameter layout
#[derive(Debug, Deserialize)]
struct ScalerParams {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// Pre-trained model bundle: the fitted scaler plus two ONNX models.
///
/// Loaded once before serving begins and immutable afterwards; a reload
/// requires a process restart.
#[derive(Debug)]
pub struct ModelBundle {
    /// Fitted feature scaler
    pub scaler: Scaler,
    /// Wind-speed regressor
    pub wind: OnnxWindModel,
    /// Intensity classifier
    pub intensity: OnnxIntensityModel,
}

impl ModelBundle {
    /// Load the three artifacts from a bundle directory
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, BundleError> {
        let dir = dir.as_ref();
        info!("Loading model bundle from {}", dir.display());

        let scaler = load_scaler(&dir.join(SCALER_FILE))?;
        let wind = OnnxWindModel {
            model: load_model(&dir.join(WIND_MODEL_FILE))?,
        };
        let intensity = OnnxIntensityModel {
            model: load_model(&dir.join(INTENSITY_MODEL_FILE))?,
        };

        info!("Model bundle loaded");
        Ok(Self {
            scaler,
            wind,
            intensity,
        })
    }
}

fn load_scaler(path: &Path) -> Result<Scaler, BundleError> {
    let raw = std::fs::read_to_string(path).map_err(|source| BundleError::ArtifactUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let params: ScalerParams =
        serde_json::from_str(&raw).map_err(|source| BundleError::ScalerMalformed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Scaler::new(params.mean, params.scale)?)
}

fn load_model(path: &Path) -> Result<RunnableOnnxModel, BundleError> {
    let build = || -> TractResult<RunnableOnnxModel> {
        tract_onnx::onnx()
            .model_for_path(path)?
            .with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into())?
            .into_optimized()?
            .into_runnable()
    };
    build().map_err(|err| BundleError::ModelLoad {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })
}

/// Run a model on a single `[1, FEATURE_DIMENSION]` f32 input
fn run_model(
    model: &RunnableOnnxModel,
    features: &[f64; FEATURE_DIMENSION],
) -> TractResult<TVec<TValue>> {
    let input =
        tract_ndarray::Array2::from_shape_fn((1, FEATURE_DIMENSION), |(_, col)| {
            features[col] as f32
        });
    model.run(tvec!(Tensor::from(input).into()))
}

/// tract-backed wind-speed regressor
#[derive(Debug)]
pub struct OnnxWindModel {
    model: RunnableOnnxModel,
}

impl WindModel for OnnxWindModel {
    fn predict(&self, features: &[f64; FEATURE_DIMENSION]) -> Result<f64, InferenceError> {
        let outputs = run_model(&self.model, features)
            .map_err(|err| InferenceError::Regression(err.to_string()))?;
        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(|err| InferenceError::Regression(err.to_string()))?;
        let value = view
            .iter()
            .next()
            .copied()
            .ok_or_else(|| InferenceError::Regression("model returned an empty tensor".into()))?;
        Ok(f64::from(value))
    }
}

/// tract-backed intensity classifier
#[derive(Debug)]
pub struct OnnxIntensityModel {
    model: RunnableOnnxModel,
}

impl IntensityModel for OnnxIntensityModel {
    fn predict(&self, features: &[f64; FEATURE_DIMENSION]) -> Result<i64, InferenceError> {
        let outputs = run_model(&self.model, features)
            .map_err(|err| InferenceError::Classification(err.to_string()))?;
        let view = outputs[0]
            .to_array_view::<i64>()
            .map_err(|err| InferenceError::Classification(err.to_string()))?;
        view.iter().next().copied().ok_or_else(|| {
            InferenceError::Classification("model returned an empty tensor".into())
        })
    }
}
