//! Feature source port: Trait for resolving a model's input features.

use super::ResourceError;

/// Resolves the ordered input feature names of a disease's model.
pub trait FeatureSource: Send + Sync {
    /// Feature names in training column order, label column excluded.
    ///
    /// # Errors
    /// Returns `ResourceError` if the disease is unknown or its source cannot
    /// be read.
    fn try_resolve(&self, disease: &str) -> Result<Vec<String>, ResourceError>;

    /// Feature names, or an empty list when unavailable.
    fn resolve(&self, disease: &str) -> Vec<String> {
        self.try_resolve(disease).unwrap_or_else(|e| {
            tracing::warn!("Features unavailable: {}", e);
            Vec::new()
        })
    }
}
