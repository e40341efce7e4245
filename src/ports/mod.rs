//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (SQLite, datasets, models).

mod feature_source;
mod predictor;
mod storage;

pub use feature_source::FeatureSource;
pub use predictor::{ModelRepository, Predictor, PredictorError};
pub use storage::{CredentialStore, InsertOutcome};

/// A configured resource could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("Unknown disease: {0}")]
    UnknownDisease(String),

    #[error("Resource missing: {0}")]
    Missing(String),

    #[error("Resource unreadable: {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Resource invalid: {path}: {message}")]
    Invalid { path: String, message: String },
}
