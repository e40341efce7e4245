//! Feature inputs: metadata, input widgets and feature vectors.
//!
//! Feature names come from the column headers of each disease's dataset.
//! Each name is paired with an [`InputSpec`] describing how the form collects
//! it, and submitted values are assembled into a [`FeatureVector`] in the
//! exact column order the model was trained on.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Column name collected through the Male/Female selector.
pub const SEX_FEATURE: &str = "sex";

/// Bounds used when a feature has no metadata entry.
const FALLBACK_MIN: f64 = 0.0;
const FALLBACK_MAX: f64 = 100.0;

/// Default value of a numeric input.
///
/// Integer defaults produce whole-number inputs (step 1); fractional defaults
/// produce inputs with step 0.1 shown with two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericDefault {
    Integer(i64),
    Fractional(f64),
}

impl NumericDefault {
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Integer(v) => v as f64,
            Self::Fractional(v) => v,
        }
    }
}

/// Numeric bounds and default for one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureBounds {
    pub min: f64,
    pub max: f64,
    pub default: NumericDefault,
}

impl FeatureBounds {
    #[must_use]
    pub fn integer(min: i64, max: i64, default: i64) -> Self {
        Self {
            min: min as f64,
            max: max as f64,
            default: NumericDefault::Integer(default),
        }
    }

    #[must_use]
    pub fn fractional(min: f64, max: f64, default: f64) -> Self {
        Self {
            min,
            max,
            default: NumericDefault::Fractional(default),
        }
    }
}

impl Default for FeatureBounds {
    fn default() -> Self {
        Self {
            min: FALLBACK_MIN,
            max: FALLBACK_MAX,
            default: NumericDefault::Integer(0),
        }
    }
}

/// Two-valued selector for the `sex` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    /// Encoded model input: Male = 1, Female = 0.
    #[must_use]
    pub fn encode(self) -> f64 {
        match self {
            Self::Male => 1.0,
            Self::Female => 0.0,
        }
    }

    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
        }
    }
}

/// How the form collects one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputSpec {
    /// Male/Female selector encoded as 1/0
    Sex,
    /// Bounded numeric input
    Numeric(FeatureBounds),
}

impl InputSpec {
    /// Step between adjacent values of the input.
    #[must_use]
    pub fn step(&self) -> f64 {
        match self {
            Self::Numeric(FeatureBounds {
                default: NumericDefault::Fractional(_),
                ..
            }) => 0.1,
            _ => 1.0,
        }
    }

    /// Number of decimals shown by the input.
    #[must_use]
    pub fn decimals(&self) -> usize {
        match self {
            Self::Numeric(FeatureBounds {
                default: NumericDefault::Fractional(_),
                ..
            }) => 2,
            _ => 0,
        }
    }

    /// Whether the input accepts fractional values.
    #[must_use]
    pub fn is_fractional(&self) -> bool {
        self.decimals() > 0
    }

    /// Initial model value of the input.
    #[must_use]
    pub fn default_value(&self) -> f64 {
        match self {
            Self::Sex => Sex::default().encode(),
            Self::Numeric(bounds) => bounds.default.value(),
        }
    }

    /// Format a value with this input's precision.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        format!("{:.*}", self.decimals(), value)
    }
}

/// A feature name paired with its input.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub input: InputSpec,
}

/// Errors loading a metadata file.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read feature metadata {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid feature metadata: {0}")]
    Format(String),
}

/// Per-disease, per-feature bounds table.
#[derive(Debug, Clone, Default)]
pub struct FeatureMetadata {
    table: HashMap<String, HashMap<String, FeatureBounds>>,
}

impl FeatureMetadata {
    /// Empty table: every feature falls back to `[0, 100]` with default 0.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace one entry.
    pub fn insert(&mut self, disease: &str, feature: &str, bounds: FeatureBounds) {
        self.table
            .entry(disease.to_string())
            .or_default()
            .insert(feature.to_string(), bounds);
    }

    /// Look up the bounds for a feature, if configured.
    #[must_use]
    pub fn bounds(&self, disease: &str, feature: &str) -> Option<FeatureBounds> {
        self.table.get(disease)?.get(feature).copied()
    }

    /// Input spec for a feature of a disease.
    #[must_use]
    pub fn input_spec(&self, disease: &str, feature: &str) -> InputSpec {
        if feature == SEX_FEATURE {
            return InputSpec::Sex;
        }
        InputSpec::Numeric(self.bounds(disease, feature).unwrap_or_default())
    }

    /// Load a table from a JSON file shaped `{disease: {feature: [min, max, default]}}`.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is malformed.
    pub fn from_json_file(path: &Path) -> Result<Self, MetadataError> {
        let content = std::fs::read_to_string(path).map_err(|e| MetadataError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    /// Parse a table from JSON.
    ///
    /// # Errors
    /// Returns `MetadataError::Format` if the document is malformed.
    pub fn from_json_str(content: &str) -> Result<Self, MetadataError> {
        let root: Value =
            serde_json::from_str(content).map_err(|e| MetadataError::Format(e.to_string()))?;
        let diseases = root
            .as_object()
            .ok_or_else(|| MetadataError::Format("top level must be an object".into()))?;

        let mut metadata = Self::empty();
        for (disease, features) in diseases {
            let features = features.as_object().ok_or_else(|| {
                MetadataError::Format(format!("'{disease}' must map feature names to bounds"))
            })?;
            for (feature, triple) in features {
                let bounds = parse_bounds(triple).map_err(|msg| {
                    MetadataError::Format(format!("{disease}/{feature}: {msg}"))
                })?;
                metadata.insert(disease, feature, bounds);
            }
        }
        Ok(metadata)
    }

    /// Built-in table for the shipped datasets.
    #[must_use]
    pub fn builtin() -> Self {
        let mut m = Self::empty();

        let diabetes = "Diabetes";
        m.insert(diabetes, "Pregnancies", FeatureBounds::integer(0, 20, 1));
        m.insert(diabetes, "Glucose", FeatureBounds::integer(0, 200, 120));
        m.insert(diabetes, "BloodPressure", FeatureBounds::integer(0, 140, 70));
        m.insert(diabetes, "SkinThickness", FeatureBounds::integer(0, 100, 20));
        m.insert(diabetes, "Insulin", FeatureBounds::integer(0, 900, 80));
        m.insert(diabetes, "BMI", FeatureBounds::fractional(0.0, 70.0, 25.0));
        m.insert(
            diabetes,
            "DiabetesPedigreeFunction",
            FeatureBounds::fractional(0.0, 2.5, 0.5),
        );
        m.insert(diabetes, "Age", FeatureBounds::integer(1, 120, 33));

        let heart = "Heart Disease";
        m.insert(heart, "age", FeatureBounds::integer(1, 120, 50));
        m.insert(heart, "cp", FeatureBounds::integer(0, 3, 0));
        m.insert(heart, "trestbps", FeatureBounds::integer(80, 200, 120));
        m.insert(heart, "chol", FeatureBounds::integer(100, 600, 200));
        m.insert(heart, "fbs", FeatureBounds::integer(0, 1, 0));
        m.insert(heart, "restecg", FeatureBounds::integer(0, 2, 0));
        m.insert(heart, "thalach", FeatureBounds::integer(60, 220, 150));
        m.insert(heart, "exang", FeatureBounds::integer(0, 1, 0));
        m.insert(heart, "oldpeak", FeatureBounds::fractional(0.0, 7.0, 1.0));
        m.insert(heart, "slope", FeatureBounds::integer(0, 2, 1));
        m.insert(heart, "ca", FeatureBounds::integer(0, 4, 0));
        m.insert(heart, "thal", FeatureBounds::integer(0, 3, 2));

        let parkinsons = "Parkinson's";
        m.insert(parkinsons, "MDVP:Fo(Hz)", FeatureBounds::fractional(80.0, 270.0, 150.0));
        m.insert(parkinsons, "MDVP:Fhi(Hz)", FeatureBounds::fractional(100.0, 600.0, 200.0));
        m.insert(parkinsons, "MDVP:Flo(Hz)", FeatureBounds::fractional(60.0, 250.0, 110.0));
        m.insert(parkinsons, "MDVP:Shimmer(dB)", FeatureBounds::fractional(0.0, 1.5, 0.28));
        m.insert(parkinsons, "HNR", FeatureBounds::fractional(5.0, 35.0, 22.0));
        m.insert(parkinsons, "RPDE", FeatureBounds::fractional(0.2, 0.8, 0.5));
        m.insert(parkinsons, "DFA", FeatureBounds::fractional(0.5, 0.9, 0.72));
        m.insert(parkinsons, "spread1", FeatureBounds::fractional(-8.0, -2.0, -5.7));
        m.insert(parkinsons, "PPE", FeatureBounds::fractional(0.0, 0.6, 0.21));

        let lung = "Lung Cancer";
        m.insert(lung, "GENDER", FeatureBounds::integer(0, 1, 1));
        m.insert(lung, "AGE", FeatureBounds::integer(1, 120, 60));
        for symptom in [
            "SMOKING",
            "YELLOW_FINGERS",
            "ANXIETY",
            "CHRONIC_DISEASE",
            "FATIGUE",
            "WHEEZING",
            "COUGHING",
            "SHORTNESS_OF_BREATH",
            "CHEST_PAIN",
        ] {
            m.insert(lung, symptom, FeatureBounds::integer(1, 2, 1));
        }

        let thyroid = "Thyroid";
        m.insert(thyroid, "age", FeatureBounds::integer(1, 100, 50));
        m.insert(thyroid, "on_thyroxine", FeatureBounds::integer(0, 1, 0));
        m.insert(thyroid, "TSH", FeatureBounds::fractional(0.0, 100.0, 2.5));
        m.insert(thyroid, "T3", FeatureBounds::fractional(0.0, 10.0, 2.0));
        m.insert(thyroid, "TT4", FeatureBounds::fractional(0.0, 300.0, 110.0));
        m.insert(thyroid, "T4U", FeatureBounds::fractional(0.0, 2.5, 1.0));
        m.insert(thyroid, "FTI", FeatureBounds::fractional(0.0, 300.0, 110.0));

        m
    }
}

fn parse_bounds(value: &Value) -> Result<FeatureBounds, String> {
    let triple = value
        .as_array()
        .filter(|a| a.len() == 3)
        .ok_or_else(|| "expected [min, max, default]".to_string())?;

    let number = |v: &Value| v.as_f64().ok_or_else(|| format!("{v} is not a number"));
    let min = number(&triple[0])?;
    let max = number(&triple[1])?;
    if !min.is_finite() || !max.is_finite() {
        return Err("bounds must be finite".into());
    }
    if min > max {
        return Err(format!("min {min} exceeds max {max}"));
    }

    let default = match triple[2].as_i64() {
        Some(v) => NumericDefault::Integer(v),
        None => NumericDefault::Fractional(number(&triple[2])?),
    };
    let value = default.value();
    if !(min..=max).contains(&value) {
        return Err(format!("default {value} lies outside [{min}, {max}]"));
    }

    Ok(FeatureBounds { min, max, default })
}

/// A resolved feature was not supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing value for feature '{0}'")]
pub struct MissingFeature(pub String);

/// Single-row model input in training column order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Assemble values in `order`, regardless of how `values` is keyed.
    ///
    /// Values for names not present in `order` are ignored.
    ///
    /// # Errors
    /// Returns `MissingFeature` for the first name in `order` without a value.
    pub fn assemble(order: &[String], values: &HashMap<String, f64>) -> Result<Self, MissingFeature> {
        order
            .iter()
            .map(|name| {
                values
                    .get(name)
                    .copied()
                    .ok_or_else(|| MissingFeature(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_feature_uses_selector() {
        let metadata = FeatureMetadata::builtin();
        assert_eq!(metadata.input_spec("Heart Disease", "sex"), InputSpec::Sex);
        assert_eq!(Sex::Male.encode(), 1.0);
        assert_eq!(Sex::Female.encode(), 0.0);
        assert_eq!(Sex::Male.toggle(), Sex::Female);
    }

    #[test]
    fn test_fallback_bounds() {
        let metadata = FeatureMetadata::builtin();
        let spec = metadata.input_spec("Diabetes", "Unlisted");
        assert_eq!(spec, InputSpec::Numeric(FeatureBounds::integer(0, 100, 0)));
        assert_eq!(spec.step(), 1.0);
        assert_eq!(spec.decimals(), 0);

        let unknown = metadata.input_spec("Unknown", "x");
        assert_eq!(unknown.default_value(), 0.0);
    }

    #[test]
    fn test_precision_follows_default_kind() {
        let metadata = FeatureMetadata::builtin();

        let glucose = metadata.input_spec("Diabetes", "Glucose");
        assert!(!glucose.is_fractional());
        assert_eq!(glucose.format(120.0), "120");

        let bmi = metadata.input_spec("Diabetes", "BMI");
        assert!(bmi.is_fractional());
        assert!((bmi.step() - 0.1).abs() < f64::EPSILON);
        assert_eq!(bmi.format(25.0), "25.00");
    }

    #[test]
    fn test_json_metadata_keeps_number_kind() {
        let json = r#"{"Diabetes": {"Glucose": [0, 250, 110], "BMI": [10, 60.5, 22.5]}}"#;
        let metadata = FeatureMetadata::from_json_str(json).expect("Should parse");

        assert_eq!(
            metadata.bounds("Diabetes", "Glucose"),
            Some(FeatureBounds::integer(0, 250, 110))
        );
        assert_eq!(
            metadata.bounds("Diabetes", "BMI"),
            Some(FeatureBounds::fractional(10.0, 60.5, 22.5))
        );
        assert!(metadata.bounds("Diabetes", "Age").is_none());
    }

    #[test]
    fn test_json_metadata_rejects_bad_shapes() {
        assert!(FeatureMetadata::from_json_str("[]").is_err());
        assert!(FeatureMetadata::from_json_str(r#"{"D": {"f": [1, 2]}}"#).is_err());
        assert!(FeatureMetadata::from_json_str(r#"{"D": {"f": [5, 1, 2]}}"#).is_err());
        assert!(FeatureMetadata::from_json_str(r#"{"D": {"f": ["a", 1, 2]}}"#).is_err());

        let err = FeatureMetadata::from_json_str(r#"{"Diabetes": {"Glucose": [0, 100, 500]}}"#)
            .expect_err("Default above max should be rejected");
        assert!(err.to_string().contains("Diabetes/Glucose"));
        assert!(FeatureMetadata::from_json_str(r#"{"D": {"f": [1.5, 3, 0.5]}}"#).is_err());

        // Defaults on the bounds themselves are fine.
        assert!(FeatureMetadata::from_json_str(r#"{"D": {"f": [0, 1, 1]}}"#).is_ok());
    }

    #[test]
    fn test_builtin_defaults_lie_within_bounds() {
        let metadata = FeatureMetadata::builtin();
        for features in metadata.table.values() {
            for bounds in features.values() {
                let v = bounds.default.value();
                assert!(bounds.min <= v && v <= bounds.max, "{bounds:?}");
            }
        }
    }

    #[test]
    fn test_assemble_follows_order() {
        let order: Vec<String> = vec!["b".into(), "a".into(), "c".into()];
        let values: HashMap<String, f64> = [
            ("a".to_string(), 1.0),
            ("c".to_string(), 3.0),
            ("b".to_string(), 2.0),
            ("extra".to_string(), 9.0),
        ]
        .into_iter()
        .collect();

        let vector = FeatureVector::assemble(&order, &values).expect("Should assemble");
        assert_eq!(vector.as_slice(), &[2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_assemble_reports_missing() {
        let order: Vec<String> = vec!["a".into(), "b".into()];
        let values: HashMap<String, f64> = [("a".to_string(), 1.0)].into_iter().collect();

        let err = FeatureVector::assemble(&order, &values).expect_err("Should fail");
        assert_eq!(err, MissingFeature("b".into()));
    }
}
