//! Domain layer: Core types and logic.
//!
//! This module contains plain Rust types with no I/O beyond reading
//! configuration files. All types implement strict validation.

mod diagnosis;
mod disease;
mod feature;
pub mod kdf;
mod session;
mod user;

pub use diagnosis::{Label, Verdict};
pub use disease::{DiseaseEntry, DiseaseRegistry, RegistryError, ResourceReport};
pub use feature::{
    FeatureBounds, FeatureMetadata, FeatureVector, FieldSpec, InputSpec, MetadataError,
    MissingFeature, NumericDefault, Sex, SEX_FEATURE,
};
pub use session::{NavAction, Page, Session};
pub use user::{validate_username, UserRecord};
