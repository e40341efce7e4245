//! Model adapter: Implementation of ModelRepository for JSON model exports.
//!
//! Each disease's classifier is a standardized logistic regression exported
//! as JSON by the training pipeline:
//!
//! ```json
//! {
//!   "feature_names": ["Glucose", "BMI"],
//!   "coefficients": [1.1, 0.7],
//!   "intercept": -0.8,
//!   "scaler_mean": [120.9, 32.0],
//!   "scaler_scale": [31.9, 7.9],
//!   "threshold": 0.5
//! }
//! ```
//!
//! `scaler_mean`, `scaler_scale` and `threshold` are optional. Artifacts are
//! validated on load; a malformed file is reported, never half-loaded.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{DiseaseRegistry, Label};
use crate::ports::{ModelRepository, Predictor, PredictorError, ResourceError};

fn default_threshold() -> f64 {
    0.5
}

/// Logistic regression parameters as exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scaler_scale: Option<Vec<f64>>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticModel {
    /// Check parameter shapes and values.
    ///
    /// # Errors
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err("model has no features".into());
        }
        if self.coefficients.len() != n {
            return Err(format!(
                "coefficient count {} does not match feature count {n}",
                self.coefficients.len()
            ));
        }
        if let Some(mean) = &self.scaler_mean {
            if mean.len() != n {
                return Err(format!("scaler_mean length {} does not match {n}", mean.len()));
            }
        }
        if let Some(scale) = &self.scaler_scale {
            if scale.len() != n {
                return Err(format!("scaler_scale length {} does not match {n}", scale.len()));
            }
            if scale.iter().any(|s| *s == 0.0) {
                return Err("scaler_scale contains zero".into());
            }
        }

        let all_finite = self
            .coefficients
            .iter()
            .chain(self.scaler_mean.iter().flatten())
            .chain(self.scaler_scale.iter().flatten())
            .chain(std::iter::once(&self.intercept))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err("model contains non-finite parameters".into());
        }

        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(format!("threshold {} must lie in (0, 1)", self.threshold));
        }
        Ok(())
    }

    /// Read and validate a model file.
    ///
    /// # Errors
    /// Returns `ResourceError` if the file is missing, unreadable or invalid.
    pub fn from_file(path: &Path) -> Result<Self, ResourceError> {
        if !path.is_file() {
            return Err(ResourceError::Missing(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| ResourceError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let invalid = |message: String| ResourceError::Invalid {
            path: path.display().to_string(),
            message,
        };
        let model: Self = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        model.validate().map_err(invalid)?;

        tracing::info!(
            "Loaded model from {:?} (n_features={}, threshold={})",
            path,
            model.feature_names.len(),
            model.threshold
        );
        Ok(model)
    }

    /// Probability of the positive class.
    ///
    /// # Errors
    /// Returns error if the input does not match the model.
    pub fn probability(&self, features: &[f64]) -> Result<f64, PredictorError> {
        let n = self.coefficients.len();
        if features.len() != n {
            return Err(PredictorError::FeatureCount {
                got: features.len(),
                expected: n,
            });
        }

        let mut z = self.intercept;
        for (i, (x, w)) in features.iter().zip(self.coefficients.iter()).enumerate() {
            if !x.is_finite() {
                return Err(PredictorError::NonFinite(i));
            }
            let mean = self.scaler_mean.as_ref().map_or(0.0, |m| m[i]);
            let scale = self.scaler_scale.as_ref().map_or(1.0, |s| s[i]);
            z += w * (x - mean) / scale;
        }

        Ok(sigmoid(z))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Predictor for LogisticModel {
    fn classify(&self, features: &[f64]) -> Result<Label, PredictorError> {
        let p = self.probability(features)?;
        Ok(if p >= self.threshold {
            Label::Positive
        } else {
            Label::Negative
        })
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.feature_names)
    }
}

/// Loads JSON models from the paths listed in a registry.
///
/// Artifacts are read from disk on every load.
#[derive(Debug, Clone)]
pub struct JsonModelRepository {
    registry: Arc<DiseaseRegistry>,
}

impl JsonModelRepository {
    #[must_use]
    pub fn new(registry: Arc<DiseaseRegistry>) -> Self {
        Self { registry }
    }
}

impl ModelRepository for JsonModelRepository {
    fn try_load(&self, disease: &str) -> Result<Box<dyn Predictor>, ResourceError> {
        let entry = self
            .registry
            .get(disease)
            .ok_or_else(|| ResourceError::UnknownDisease(disease.to_string()))?;

        let model = LogisticModel::from_file(&entry.model_source)?;
        Ok(Box::new(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DiseaseEntry;
    use tempfile::tempdir;

    fn model(coefficients: Vec<f64>, intercept: f64) -> LogisticModel {
        LogisticModel {
            feature_names: (0..coefficients.len()).map(|i| format!("f{i}")).collect(),
            coefficients,
            intercept,
            scaler_mean: None,
            scaler_scale: None,
            threshold: 0.5,
        }
    }

    fn single_entry_repo(dir: &Path) -> JsonModelRepository {
        let registry = DiseaseRegistry::new(vec![DiseaseEntry {
            name: "Diabetes".into(),
            feature_source: dir.join("d.csv"),
            model_source: dir.join("d.json"),
        }])
        .expect("Should build");
        JsonModelRepository::new(Arc::new(registry))
    }

    #[test]
    fn test_classify_thresholds_probability() {
        let m = model(vec![1.0], 0.0);
        assert_eq!(m.classify(&[2.0]), Ok(Label::Positive));
        assert_eq!(m.classify(&[-2.0]), Ok(Label::Negative));
        // sigmoid(0) == 0.5 sits on the threshold
        assert_eq!(m.classify(&[0.0]), Ok(Label::Positive));
    }

    #[test]
    fn test_standardization_applied() {
        let mut m = model(vec![1.0], 0.0);
        m.scaler_mean = Some(vec![100.0]);
        m.scaler_scale = Some(vec![10.0]);

        let p = m.probability(&[110.0]).expect("Should score");
        assert!((p - sigmoid(1.0)).abs() < 1e-12);
        assert_eq!(m.classify(&[90.0]), Ok(Label::Negative));
    }

    #[test]
    fn test_classify_rejects_bad_input() {
        let m = model(vec![1.0, 2.0], 0.0);
        assert_eq!(
            m.classify(&[1.0]),
            Err(PredictorError::FeatureCount { got: 1, expected: 2 })
        );
        assert_eq!(m.classify(&[1.0, f64::NAN]), Err(PredictorError::NonFinite(1)));
    }

    #[test]
    fn test_validate_rejects_mismatched_shapes() {
        let mut m = model(vec![1.0, 2.0], 0.0);
        m.feature_names.pop();
        assert!(m.validate().is_err());

        let mut m = model(vec![1.0], 0.0);
        m.scaler_scale = Some(vec![0.0]);
        assert!(m.validate().is_err());

        let mut m = model(vec![1.0], 0.0);
        m.threshold = 1.5;
        assert!(m.validate().is_err());

        assert!(model(vec![], 0.0).validate().is_err());
        assert!(model(vec![f64::INFINITY], 0.0).validate().is_err());
    }

    #[test]
    fn test_repository_loads_valid_file() {
        let temp = tempdir().expect("tempdir");
        let json = serde_json::to_string(&model(vec![0.5, -0.5], 0.1)).expect("serialize");
        std::fs::write(temp.path().join("d.json"), json).expect("write model");

        let repo = single_entry_repo(temp.path());
        let predictor = repo.load("Diabetes").expect("Should load");
        assert!(predictor.classify(&[1.0, 1.0]).is_ok());
    }

    #[test]
    fn test_repository_defaults_threshold() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(
            temp.path().join("d.json"),
            r#"{"feature_names": ["a"], "coefficients": [1.0], "intercept": 0.0}"#,
        )
        .expect("write model");

        let m = LogisticModel::from_file(&temp.path().join("d.json")).expect("Should load");
        assert!((m.threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_repository_absent_cases() {
        let temp = tempdir().expect("tempdir");
        let repo = single_entry_repo(temp.path());

        assert!(repo.load("Unknown").is_none());
        assert!(matches!(
            repo.try_load("Unknown"),
            Err(ResourceError::UnknownDisease(_))
        ));

        assert!(repo.load("Diabetes").is_none());
        assert!(matches!(repo.try_load("Diabetes"), Err(ResourceError::Missing(_))));

        std::fs::write(temp.path().join("d.json"), "{not json").expect("write");
        assert!(matches!(
            repo.try_load("Diabetes"),
            Err(ResourceError::Invalid { .. })
        ));
    }

    #[test]
    fn test_every_shipped_model_loads() {
        let registry = Arc::new(DiseaseRegistry::builtin(Path::new(env!("CARGO_MANIFEST_DIR"))));
        let repo = JsonModelRepository::new(registry.clone());

        for name in registry.names() {
            assert!(repo.try_load(name).is_ok(), "{name} model should load");
        }
    }
}
