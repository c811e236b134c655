//! Feature Vector Assembly

use crate::error::FeatureError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Number of features the models were fitted with
pub const FEATURE_DIMENSION: usize = 10;

/// Request keys in fitted order. The scaler and both models consume
/// features in exactly this order; reordering silently corrupts every
/// prediction, so extraction always walks this table.
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "Latitude",
    "Longitude",
    "Pressure",
    "Temperature",
    "Humidity",
    "Hour",
    "Day",
    "WindSpeed_lag",
    "Pressure_lag",
    "TempHumidityIndex",
];

/// Feature vector consumed by the scaler and models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature values in fitted order
    pub values: [f64; FEATURE_DIMENSION],
}

impl FeatureVector {
    /// Create a vector directly from ordered values
    pub fn new(values: [f64; FEATURE_DIMENSION]) -> Self {
        Self { values }
    }

    /// Decode a prediction request body into a feature vector.
    ///
    /// Fails closed: the first problem aborts the decode. Keys are checked
    /// in fitted order, so a request missing several keys reports the
    /// earliest one.
    pub fn from_request(body: &Value) -> Result<Self, FeatureError> {
        let object = body.as_object().ok_or(FeatureError::NotAnObject)?;

        let mut values = [0.0; FEATURE_DIMENSION];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            let raw = object.get(name).ok_or(FeatureError::MissingKey(name))?;
            *slot = raw
                .as_f64()
                .ok_or(FeatureError::NonNumeric { field: name })?;
        }

        debug!("Decoded feature vector: {:?}", values);
        Ok(Self { values })
    }
}
