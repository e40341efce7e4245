//! Dataset adapter: Implementation of FeatureSource over CSV headers.
//!
//! Each disease's dataset is a CSV file whose header row names the model's
//! input features followed by the label column. Only the header is read.

use std::path::Path;
use std::sync::Arc;

use crate::domain::DiseaseRegistry;
use crate::ports::{FeatureSource, ResourceError};

/// Resolves feature names from dataset headers listed in a registry.
#[derive(Debug, Clone)]
pub struct CsvFeatureSource {
    registry: Arc<DiseaseRegistry>,
}

impl CsvFeatureSource {
    #[must_use]
    pub fn new(registry: Arc<DiseaseRegistry>) -> Self {
        Self { registry }
    }
}

/// Read the header row of a CSV file and drop the trailing label column.
///
/// # Errors
/// Returns `ResourceError` if the file is missing or its header is unreadable.
pub fn read_feature_header(path: &Path) -> Result<Vec<String>, ResourceError> {
    if !path.is_file() {
        return Err(ResourceError::Missing(path.display().to_string()));
    }

    let unreadable = |message: String| ResourceError::Unreadable {
        path: path.display().to_string(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| unreadable(format!("Failed to open CSV: {e}")))?;

    let headers = reader
        .headers()
        .map_err(|e| unreadable(format!("Failed to read headers: {e}")))?;

    let mut names: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    if names.iter().all(|h| h.is_empty()) {
        return Err(unreadable("header row is empty".to_string()));
    }

    // Last column is the label.
    names.pop();
    Ok(names)
}

impl FeatureSource for CsvFeatureSource {
    fn try_resolve(&self, disease: &str) -> Result<Vec<String>, ResourceError> {
        let entry = self
            .registry
            .get(disease)
            .ok_or_else(|| ResourceError::UnknownDisease(disease.to_string()))?;

        let names = read_feature_header(&entry.feature_source)?;
        tracing::debug!("Resolved {} features for {}", names.len(), disease);
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DiseaseEntry;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn shipped_registry() -> Arc<DiseaseRegistry> {
        Arc::new(DiseaseRegistry::builtin(Path::new(env!("CARGO_MANIFEST_DIR"))))
    }

    #[test]
    fn test_header_excludes_label() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "Glucose,BMI,Age,Outcome").expect("write header");
        writeln!(file, "120,25.1,33,0").expect("write row");

        let names = read_feature_header(file.path()).expect("Should read header");
        assert_eq!(names, ["Glucose", "BMI", "Age"]);
    }

    #[test]
    fn test_header_only_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "a, b ,label").expect("write header");

        let names = read_feature_header(file.path()).expect("Should read header");
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_empty_file_is_unreadable() {
        let file = NamedTempFile::new().expect("temp file");
        let err = read_feature_header(file.path()).expect_err("Should fail");
        assert!(matches!(err, ResourceError::Unreadable { .. }));
    }

    #[test]
    fn test_resolve_known_disease() {
        let source = CsvFeatureSource::new(shipped_registry());

        let names = source.resolve("Diabetes");
        assert_eq!(names.len(), 8);
        assert_eq!(names.first().map(String::as_str), Some("Pregnancies"));
        assert!(!names.iter().any(|n| n == "Outcome"));
    }

    #[test]
    fn test_every_shipped_dataset_resolves() {
        let registry = shipped_registry();
        let source = CsvFeatureSource::new(registry.clone());

        for name in registry.names() {
            let names = source.try_resolve(name).expect("Shipped dataset should resolve");
            assert!(!names.is_empty(), "{name} has no features");
        }
    }

    #[test]
    fn test_resolve_unknown_disease_is_empty() {
        let source = CsvFeatureSource::new(shipped_registry());

        assert!(source.resolve("Common Cold").is_empty());
        assert_eq!(
            source.try_resolve("Common Cold"),
            Err(ResourceError::UnknownDisease("Common Cold".into()))
        );
    }

    #[test]
    fn test_resolve_missing_file_is_empty() {
        let temp = tempdir().expect("tempdir");
        let registry = DiseaseRegistry::new(vec![DiseaseEntry {
            name: "Diabetes".into(),
            feature_source: temp.path().join("absent.csv"),
            model_source: temp.path().join("absent.json"),
        }])
        .expect("Should build");
        let source = CsvFeatureSource::new(Arc::new(registry));

        assert!(source.resolve("Diabetes").is_empty());
        assert!(matches!(
            source.try_resolve("Diabetes"),
            Err(ResourceError::Missing(_))
        ));
    }
}
