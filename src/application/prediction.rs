//! Prediction service: Builds the input form and dispatches predictions.
//!
//! This service coordinates:
//! - Feature resolution from dataset headers
//! - Input specs from the feature metadata table
//! - Model loading
//! - Vector assembly in training order and verdict mapping

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{
    DiseaseRegistry, FeatureMetadata, FeatureVector, FieldSpec, MissingFeature, Verdict,
};
use crate::ports::{FeatureSource, ModelRepository, Predictor, PredictorError};

/// Errors that prevent a verdict.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("Model not found for {0}")]
    ModelNotFound(String),

    #[error("No input features available for {0}")]
    NoFeatures(String),

    #[error("Feature order of {disease} does not match its model: expected {expected:?}, resolved {resolved:?}")]
    FeatureOrderMismatch {
        disease: String,
        expected: Vec<String>,
        resolved: Vec<String>,
    },

    #[error(transparent)]
    MissingFeature(#[from] MissingFeature),

    #[error("Prediction failed: {0}")]
    Predictor(#[from] PredictorError),
}

impl PredictionError {
    /// Message shown in the form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ModelNotFound(_) => "Error: Model not found!".to_string(),
            other => format!("Error: {other}"),
        }
    }
}

/// Service for disease prediction.
pub struct PredictionService<F, M>
where
    F: FeatureSource,
    M: ModelRepository,
{
    registry: Arc<DiseaseRegistry>,
    features: Arc<F>,
    models: Arc<M>,
    metadata: Arc<FeatureMetadata>,
}

impl<F, M> PredictionService<F, M>
where
    F: FeatureSource,
    M: ModelRepository,
{
    /// Create a new prediction service.
    pub fn new(
        registry: Arc<DiseaseRegistry>,
        features: Arc<F>,
        models: Arc<M>,
        metadata: Arc<FeatureMetadata>,
    ) -> Self {
        Self {
            registry,
            features,
            models,
            metadata,
        }
    }

    /// Selectable diseases in registry order.
    #[must_use]
    pub fn diseases(&self) -> Vec<String> {
        self.registry.names().map(str::to_string).collect()
    }

    /// Ordered feature names for a disease; empty when unavailable.
    #[must_use]
    pub fn resolve(&self, disease: &str) -> Vec<String> {
        self.features.resolve(disease)
    }

    /// Trained predictor for a disease, if available.
    #[must_use]
    pub fn load(&self, disease: &str) -> Option<Box<dyn Predictor>> {
        self.models.load(disease)
    }

    /// Form fields for a disease in feature order.
    #[must_use]
    pub fn form_fields(&self, disease: &str) -> Vec<FieldSpec> {
        self.resolve(disease)
            .into_iter()
            .map(|name| FieldSpec {
                input: self.metadata.input_spec(disease, &name),
                name,
            })
            .collect()
    }

    /// Every feature of a disease at its default value.
    #[must_use]
    pub fn default_values(&self, disease: &str) -> HashMap<String, f64> {
        self.form_fields(disease)
            .into_iter()
            .map(|field| (field.name, field.input.default_value()))
            .collect()
    }

    /// Predict whether the patient has `disease`.
    ///
    /// `values` may be keyed in any order; the vector passed to the model
    /// follows the resolved feature order.
    ///
    /// # Errors
    /// Returns `PredictionError::ModelNotFound` if no model is available,
    /// `PredictionError::FeatureOrderMismatch` if the model records a training
    /// order different from the resolved one, or an input error if the values
    /// do not cover the resolved features.
    pub fn predict(
        &self,
        disease: &str,
        values: &HashMap<String, f64>,
    ) -> Result<Verdict, PredictionError> {
        let model = self
            .load(disease)
            .ok_or_else(|| PredictionError::ModelNotFound(disease.to_string()))?;

        let order = self.resolve(disease);
        if order.is_empty() {
            return Err(PredictionError::NoFeatures(disease.to_string()));
        }
        if let Some(expected) = model.feature_names() {
            if expected != order.as_slice() {
                return Err(PredictionError::FeatureOrderMismatch {
                    disease: disease.to_string(),
                    expected: expected.to_vec(),
                    resolved: order,
                });
            }
        }

        let vector = FeatureVector::assemble(&order, values)?;
        let label = model.classify(vector.as_slice())?;

        tracing::info!(
            "Prediction for {}: label={} (n_features={})",
            disease,
            label.as_raw(),
            vector.len()
        );
        Ok(Verdict::new(disease, label))
    }
}
