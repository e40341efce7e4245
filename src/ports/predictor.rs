//! Predictor port: Traits for trained models and where they come from.
//!
//! The dispatcher only needs "classify a feature vector into 0/1"; the
//! artifact format stays behind `ModelRepository`.

use crate::domain::Label;

use super::ResourceError;

/// Errors raised while classifying.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictorError {
    #[error("Feature count mismatch: got {got}, expected {expected}")]
    FeatureCount { got: usize, expected: usize },

    #[error("Non-finite input for feature {0}")]
    NonFinite(usize),
}

/// A trained binary classifier.
pub trait Predictor: Send + Sync {
    /// Classify one feature vector given in training column order.
    ///
    /// # Errors
    /// Returns error if the input does not fit the model.
    fn classify(&self, features: &[f64]) -> Result<Label, PredictorError>;

    /// Feature names in the order the model was trained on, if recorded.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

/// Source of trained predictors, keyed by disease name.
pub trait ModelRepository: Send + Sync {
    /// Load the predictor for a disease.
    ///
    /// # Errors
    /// Returns `ResourceError` if the disease is unknown or the artifact is
    /// missing or invalid.
    fn try_load(&self, disease: &str) -> Result<Box<dyn Predictor>, ResourceError>;

    /// Load the predictor for a disease, or `None` when unavailable.
    fn load(&self, disease: &str) -> Option<Box<dyn Predictor>> {
        match self.try_load(disease) {
            Ok(model) => Some(model),
            Err(e) => {
                tracing::warn!("Model unavailable: {}", e);
                None
            }
        }
    }
}
