//! Feature Error Types

use thiserror::Error;

/// Errors during request decoding and scaling
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    /// Request body is not a JSON object
    #[error("Request body must be a JSON object")]
    NotAnObject,

    /// Required key absent from the request body
    #[error("Missing key in input JSON: {0}")]
    MissingKey(&'static str),

    /// Key present but not representable as a number
    #[error("{field} is not numeric")]
    NonNumeric { field: &'static str },

    /// Scaler parameter vector has the wrong length
    #[error("scaler expects {expected} components, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Scaler component cannot be divided by
    #[error("scaler component {index} has degenerate scale {value}")]
    DegenerateScale { index: usize, value: f64 },
}
