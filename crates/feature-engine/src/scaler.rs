//! Fitted Feature Scaling

use crate::error::FeatureError;
use crate::vector::{FeatureVector, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};

/// Standardization scaler with parameters fitted at training time.
///
/// Applies `(x - mean) / scale` per component, with the mean and scale
/// supplied by the model bundle. Parameters are validated once at
/// construction so `transform` never fails at serving time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Scaler {
    /// Create a scaler from fitted parameters.
    ///
    /// Both vectors must have exactly `FEATURE_DIMENSION` components and
    /// every scale component must be finite and positive.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, FeatureError> {
        for params in [&mean, &scale] {
            if params.len() != FEATURE_DIMENSION {
                return Err(FeatureError::DimensionMismatch {
                    expected: FEATURE_DIMENSION,
                    actual: params.len(),
                });
            }
        }

        if let Some((index, &value)) = scale
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_finite() || **s <= 0.0)
        {
            return Err(FeatureError::DegenerateScale { index, value });
        }

        Ok(Self { mean, scale })
    }

    /// Identity scaler (zero mean, unit scale)
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_DIMENSION],
            scale: vec![1.0; FEATURE_DIMENSION],
        }
    }

    /// Standardize a feature vector
    pub fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut scaled = [0.0; FEATURE_DIMENSION];
        for (i, value) in features.values.iter().enumerate() {
            scaled[i] = (value - self.mean[i]) / self.scale[i];
        }
        FeatureVector::new(scaled)
    }

    /// Fitted mean components
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Fitted scale components
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identity_transform_is_noop() {
        let scaler = Scaler::identity();
        let features = FeatureVector::new([1.0, -2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(scaler.transform(&features), features);
    }

    #[test]
    fn test_fitted_transform() {
        let scaler = Scaler::new(vec![10.0; FEATURE_DIMENSION], vec![2.0; FEATURE_DIMENSION]).unwrap();
        let features = FeatureVector::new([12.0; FEATURE_DIMENSION]);

        let scaled = scaler.transform(&features);
        assert!(scaled.values.iter().all(|v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_wrong_dimension_rejected() {
        let err = Scaler::new(vec![0.0; 3], vec![1.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::DimensionMismatch { expected: FEATURE_DIMENSION, actual: 3 }
        ));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let mut scale = vec![1.0; FEATURE_DIMENSION];
        scale[4] = 0.0;

        let err = Scaler::new(vec![0.0; FEATURE_DIMENSION], scale).unwrap_err();
        assert!(matches!(err, FeatureError::DegenerateScale { index: 4, .. }));
    }

    proptest! {
        #[test]
        fn transform_stays_finite_for_finite_input(
            values in proptest::array::uniform10(-1e6f64..1e6f64),
            mean in proptest::array::uniform10(-1e3f64..1e3f64),
            scale in proptest::array::uniform10(1e-3f64..1e3f64),
        ) {
            let scaler = Scaler::new(mean.to_vec(), scale.to_vec()).unwrap();
            let scaled = scaler.transform(&FeatureVector::new(values));
            prop_assert!(scaled.values.iter().all(|v| v.is_finite()));
        }
    }
}
