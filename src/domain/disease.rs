//! Disease registry: which dataset and model back each disease.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resources behind one selectable disease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseEntry {
    /// Display name and lookup key
    pub name: String,

    /// CSV dataset whose header row lists the model's features
    pub feature_source: PathBuf,

    /// Serialized model artifact
    pub model_source: PathBuf,
}

/// Errors loading a registry file.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read disease registry {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid disease registry: {0}")]
    Format(String),

    #[error("Disease '{0}' is listed more than once")]
    Duplicate(String),

    #[error("Disease registry is empty")]
    Empty,
}

/// Availability of one disease's resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReport {
    pub disease: String,
    pub feature_source_present: bool,
    pub model_present: bool,
}

impl ResourceReport {
    /// One-line description of what is missing, if anything.
    #[must_use]
    pub fn problem(&self) -> Option<String> {
        match (self.feature_source_present, self.model_present) {
            (true, true) => None,
            (false, true) => Some(format!("{}: dataset missing", self.disease)),
            (true, false) => Some(format!("{}: model missing", self.disease)),
            (false, false) => Some(format!("{}: dataset and model missing", self.disease)),
        }
    }
}

/// Built-in diseases and their file stems: (name, dataset, model).
const BUILTIN_DISEASES: [(&str, &str, &str); 5] = [
    ("Diabetes", "diabetes_data.csv", "diabetes.json"),
    ("Heart Disease", "heart_disease_data.csv", "heart_disease.json"),
    ("Parkinson's", "parkinson_data.csv", "parkinsons.json"),
    ("Lung Cancer", "lung_cancer_data.csv", "lung_cancer.json"),
    ("Thyroid", "hypothyroid.csv", "thyroid.json"),
];

/// Ordered, immutable mapping from disease name to resources.
#[derive(Debug, Clone)]
pub struct DiseaseRegistry {
    entries: Vec<DiseaseEntry>,
}

impl DiseaseRegistry {
    /// Build a registry from entries.
    ///
    /// # Errors
    /// Returns error if the list is empty or names repeat.
    pub fn new(entries: Vec<DiseaseEntry>) -> Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(RegistryError::Duplicate(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Built-in diseases resolved under `data_dir` (`datasets/` and `models/`).
    #[must_use]
    pub fn builtin(data_dir: &Path) -> Self {
        let entries = BUILTIN_DISEASES
            .iter()
            .map(|(name, dataset, model)| DiseaseEntry {
                name: (*name).to_string(),
                feature_source: data_dir.join("datasets").join(dataset),
                model_source: data_dir.join("models").join(model),
            })
            .collect();
        Self { entries }
    }

    /// Load a registry from a JSON array of entries.
    ///
    /// Relative paths resolve against the registry file's directory.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is invalid.
    pub fn from_json_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|e| RegistryError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json_str(&content, base)
    }

    /// Parse a registry from JSON, resolving relative paths against `base`.
    ///
    /// # Errors
    /// Returns error if the document is invalid.
    pub fn from_json_str(content: &str, base: &Path) -> Result<Self, RegistryError> {
        let entries: Vec<DiseaseEntry> =
            serde_json::from_str(content).map_err(|e| RegistryError::Format(e.to_string()))?;

        let entries = entries
            .into_iter()
            .map(|entry| DiseaseEntry {
                feature_source: resolve_against(base, entry.feature_source),
                model_source: resolve_against(base, entry.model_source),
                name: entry.name,
            })
            .collect();

        Self::new(entries)
    }

    #[must_use]
    pub fn get(&self, disease: &str) -> Option<&DiseaseEntry> {
        self.entries.iter().find(|e| e.name == disease)
    }

    /// Disease names in selector order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check which resources exist on disk.
    #[must_use]
    pub fn validate(&self) -> Vec<ResourceReport> {
        self.entries
            .iter()
            .map(|entry| ResourceReport {
                disease: entry.name.clone(),
                feature_source_present: entry.feature_source.is_file(),
                model_present: entry.model_source.is_file(),
            })
            .collect()
    }
}

fn resolve_against(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
