//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod auth;
mod prediction;

pub use auth::{AuthError, AuthService, RegisterOutcome};
pub use prediction::{PredictionError, PredictionService};
