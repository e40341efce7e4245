//! Startup configuration from `CARESCOPE_*` environment variables.
//!
//! Variables are read once. Optional resources that fail to load become
//! startup warnings; only an invalid registry file is fatal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::{DiseaseRegistry, FeatureMetadata, RegistryError};

const DEFAULT_DB_PATH: &str = "users.db";
const DEFAULT_DATA_DIR: &str = ".";

/// Fatal configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite credential database
    pub db_path: PathBuf,
    /// Root of the built-in `datasets/` and `models/` directories
    pub data_dir: PathBuf,
    /// Optional JSON registry replacing the built-in one
    pub registry_path: Option<PathBuf>,
    /// Optional JSON feature metadata replacing the built-in table
    pub metadata_path: Option<PathBuf>,
}

/// Registry, metadata and the warnings collected while loading them.
#[derive(Debug, Clone)]
pub struct Resources {
    pub registry: Arc<DiseaseRegistry>,
    pub metadata: Arc<FeatureMetadata>,
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            registry_path: None,
            metadata_path: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            db_path: get("CARESCOPE_DB_PATH").map_or(defaults.db_path, PathBuf::from),
            data_dir: get("CARESCOPE_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            registry_path: get("CARESCOPE_REGISTRY").map(PathBuf::from),
            metadata_path: get("CARESCOPE_FEATURE_METADATA").map(PathBuf::from),
        }
    }

    /// Load the disease registry and feature metadata.
    ///
    /// # Errors
    /// Returns error if a configured registry file cannot be loaded.
    pub fn load_resources(&self) -> Result<Resources, ConfigError> {
        let registry = match &self.registry_path {
            Some(path) => DiseaseRegistry::from_json_file(path)?,
            None => DiseaseRegistry::builtin(&self.data_dir),
        };

        let mut warnings = Vec::new();
        let metadata = match &self.metadata_path {
            Some(path) => load_metadata(path, &mut warnings),
            None => FeatureMetadata::builtin(),
        };

        for report in registry.validate() {
            if let Some(problem) = report.problem() {
                tracing::warn!("Resource check: {}", problem);
                warnings.push(problem);
            }
        }

        tracing::info!(
            "Loaded {} diseases ({} startup warnings)",
            registry.len(),
            warnings.len()
        );

        Ok(Resources {
            registry: Arc::new(registry),
            metadata: Arc::new(metadata),
            warnings,
        })
    }
}

fn load_metadata(path: &Path, warnings: &mut Vec<String>) -> FeatureMetadata {
    match FeatureMetadata::from_json_file(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!("{}; using built-in feature metadata", e);
            warnings.push(format!("{e}; using built-in feature metadata"));
            FeatureMetadata::builtin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[("CARESCOPE_REGISTRY", "  ")]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.db_path, PathBuf::from("users.db"));
    }

    #[test]
    fn test_values_are_read() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CARESCOPE_DB_PATH", "/tmp/u.db"),
            ("CARESCOPE_DATA_DIR", "/srv/carescope"),
            ("CARESCOPE_FEATURE_METADATA", "meta.json"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/tmp/u.db"));
        assert_eq!(config.data_dir, PathBuf::from("/srv/carescope"));
        assert_eq!(config.metadata_path, Some(PathBuf::from("meta.json")));
        assert!(config.registry_path.is_none());
    }

    #[test]
    fn test_shipped_resources_load_cleanly() {
        let config = AppConfig {
            data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            ..AppConfig::default()
        };

        let resources = config.load_resources().expect("Should load");
        assert_eq!(resources.registry.len(), 5);
        assert!(resources.warnings.is_empty(), "{:?}", resources.warnings);
    }

    #[test]
    fn test_missing_resources_become_warnings() {
        let temp = tempdir().expect("tempdir");
        let config = AppConfig {
            data_dir: temp.path().to_path_buf(),
            metadata_path: Some(temp.path().join("absent.json")),
            ..AppConfig::default()
        };

        let resources = config.load_resources().expect("Should still load");
        // One metadata warning plus one per disease.
        assert_eq!(resources.warnings.len(), 6);
        assert!(resources.warnings[0].contains("built-in feature metadata"));
        assert!(resources
            .warnings
            .iter()
            .any(|w| w == "Diabetes: dataset and model missing"));
        assert!(resources.metadata.bounds("Diabetes", "Glucose").is_some());
    }

    #[test]
    fn test_out_of_range_metadata_falls_back_to_builtin() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("metadata.json");
        std::fs::write(&path, r#"{"Diabetes": {"Glucose": [0, 100, 500]}}"#)
            .expect("write metadata");

        let config = AppConfig {
            data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            metadata_path: Some(path),
            ..AppConfig::default()
        };

        let resources = config.load_resources().expect("Should still load");
        assert_eq!(resources.warnings.len(), 1);
        assert!(resources.warnings[0].contains("Diabetes/Glucose"));
        assert_eq!(
            resources.metadata.bounds("Diabetes", "Glucose"),
            FeatureMetadata::builtin().bounds("Diabetes", "Glucose")
        );
    }

    #[test]
    fn test_invalid_registry_is_fatal() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("registry.json");
        std::fs::write(&path, "[]").expect("write registry");

        let config = AppConfig {
            registry_path: Some(path),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.load_resources(),
            Err(ConfigError::Registry(RegistryError::Empty))
        ));
    }
}
