//! Prediction Engine Implementation

use crate::bundle::ModelBundle;
use crate::InferenceError;
use feature_engine::{FeatureVector, Scaler, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Hurricane-force threshold in knots; strictly above is HIGH risk
pub const HIGH_WIND_KNOTS: f64 = 64.0;
/// Gale-force threshold in knots; strictly above is MODERATE risk
pub const MODERATE_WIND_KNOTS: f64 = 34.0;

/// Intensity category produced by the classification model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityCategory {
    /// Class 0
    TropicalDepression,
    /// Class 1
    TropicalStorm,
    /// Class 2
    Category1To2,
    /// Class 3
    Category3Plus,
}

impl IntensityCategory {
    /// Map a raw classifier output to a category.
    ///
    /// Anything outside [0, 3] breaks the classifier contract and must be
    /// surfaced as an error by the caller, never truncated.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Self::TropicalDepression),
            1 => Some(Self::TropicalStorm),
            2 => Some(Self::Category1To2),
            3 => Some(Self::Category3Plus),
            _ => None,
        }
    }

    /// Ordinal class value
    pub fn as_class(&self) -> u8 {
        match self {
            Self::TropicalDepression => 0,
            Self::TropicalStorm => 1,
            Self::Category1To2 => 2,
            Self::Category3Plus => 3,
        }
    }

    /// Human-readable tier name
    pub fn label(&self) -> &'static str {
        match self {
            Self::TropicalDepression => "Tropical Depression",
            Self::TropicalStorm => "Tropical Storm",
            Self::Category1To2 => "Category 1-2",
            Self::Category3Plus => "Category 3+",
        }
    }
}

/// Risk tier derived from the predicted wind speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Derive the tier from a wind-speed prediction in knots.
    ///
    /// Thresholds are strict greater-than: exactly 64 or 34 knots falls to
    /// the lower tier.
    pub fn from_wind_speed(knots: f64) -> Self {
        if knots > HIGH_WIND_KNOTS {
            Self::High
        } else if knots > MODERATE_WIND_KNOTS {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }
}

/// Prediction served for a single request
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Predicted sustained wind speed, rounded to 2 decimal places
    pub wind_speed_knots: f64,
    /// Ordinal intensity category (0-3)
    pub intensity_category: u8,
    /// Tier name for the category
    pub intensity_label: &'static str,
    /// Risk tier derived from the wind prediction
    pub risk_level: RiskLevel,
}

/// Wind-speed regression model seam
pub trait WindModel: Send + Sync {
    /// Predict sustained wind speed in knots from scaled features
    fn predict(&self, features: &[f64; FEATURE_DIMENSION]) -> Result<f64, InferenceError>;
}

/// Intensity classification model seam
pub trait IntensityModel: Send + Sync {
    /// Predict the raw intensity class from scaled features
    fn predict(&self, features: &[f64; FEATURE_DIMENSION]) -> Result<i64, InferenceError>;
}

/// Serving pipeline around the fitted scaler and the two models.
///
/// Stateless per request; a single engine is shared read-only across all
/// in-flight requests.
pub struct PredictionEngine {
    scaler: Scaler,
    wind: Box<dyn WindModel>,
    intensity: Box<dyn IntensityModel>,
}

impl PredictionEngine {
    /// Create an engine from a scaler and model implementations
    pub fn new(
        scaler: Scaler,
        wind: Box<dyn WindModel>,
        intensity: Box<dyn IntensityModel>,
    ) -> Self {
        info!("Creating prediction engine");
        Self {
            scaler,
            wind,
            intensity,
        }
    }

    /// Create an engine backed by a loaded model bundle
    pub fn from_bundle(bundle: ModelBundle) -> Self {
        Self::new(
            bundle.scaler,
            Box::new(bundle.wind),
            Box::new(bundle.intensity),
        )
    }

    /// Run the full pipeline on one feature vector.
    ///
    /// Either every step succeeds and a complete prediction is returned,
    /// or the request fails; there are no partial results and no retries.
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        let scaled = self.scaler.transform(features);

        let wind_pred = self.wind.predict(&scaled.values)?;
        if !wind_pred.is_finite() {
            return Err(InferenceError::NonFiniteOutput(wind_pred));
        }

        let class = self.intensity.predict(&scaled.values)?;
        let category = IntensityCategory::from_class(class)
            .ok_or(InferenceError::CategoryOutOfRange(class))?;

        // Risk is derived from the raw regression output; rounding is
        // response formatting only.
        let risk_level = RiskLevel::from_wind_speed(wind_pred);

        debug!(
            "Prediction: wind={:.2}kt class={} risk={}",
            wind_pred,
            class,
            risk_level.as_str()
        );

        Ok(Prediction {
            wind_speed_knots: round_knots(wind_pred),
            intensity_category: category.as_class(),
            intensity_label: category.label(),
            risk_level,
        })
    }
}

/// Round to 2 decimal places for the response
fn round_knots(knots: f64) -> f64 {
    (knots * 100.0).round() / 100.0
}
