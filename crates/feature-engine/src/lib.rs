//! Feature Engine
//!
//! Decodes prediction requests into the fixed feature layout and applies
//! the fitted scaler ahead of inference.

mod error;
mod scaler;
mod vector;

pub use error::FeatureError;
pub use scaler::Scaler;
pub use vector::{FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES};
