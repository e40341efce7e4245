//! # Carescope
//!
//! Disease prediction forms backed by pre-trained classifiers.
//!
//! This crate provides:
//! - Username/password accounts stored in SQLite with Argon2id hashes
//! - Per-disease input forms derived from dataset column headers
//! - Binary predictions from JSON logistic regression models
//! - Terminal UI with login, sign-up and prediction pages
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (registry, features, verdicts, pages)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (SQLite, CSV, JSON models)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment configuration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Label, Page, Verdict};

/// Result type for Carescope operations
pub type Result<T> = std::result::Result<T, CarescopeError>;

/// Main error type for Carescope
#[derive(Debug, thiserror::Error)]
pub enum CarescopeError {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Account operation failed: {0}")]
    Auth(#[from] application::AuthError),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] application::PredictionError),

    #[error("Resource unavailable: {0}")]
    Resource(#[from] ports::ResourceError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Registry(#[from] domain::RegistryError),

    #[error(transparent)]
    Metadata(#[from] domain::MetadataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
