//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `sqlite`: SQLite for account storage
//! - `dataset`: CSV dataset headers as feature sources
//! - `model`: JSON logistic regression exports as predictors
//! - `sanitize`: credential filtering for logs

pub mod dataset;
pub mod model;
pub mod sanitize;
pub mod sqlite;

// Re-export storage error for lib.rs
pub use sqlite::StorageError;
