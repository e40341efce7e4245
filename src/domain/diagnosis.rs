//! Prediction output types.
//!
//! A predictor emits a binary [`Label`]; the dispatcher pairs it with the
//! disease name to form a human-readable [`Verdict`].

use serde::{Deserialize, Serialize};

/// Binary classification output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    /// Model output 0: disease absent
    Negative,
    /// Model output 1: disease present
    Positive,
}

impl Label {
    /// Raw 0/1 value of this label.
    #[must_use]
    pub fn as_raw(self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }
}

/// Result of a prediction for one disease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Disease the prediction was made for
    pub disease: String,

    /// Predicted label
    pub label: Label,
}

impl Verdict {
    #[must_use]
    pub fn new(disease: impl Into<String>, label: Label) -> Self {
        Self {
            disease: disease.into(),
            label,
        }
    }

    /// Whether the model predicted the disease.
    #[must_use]
    pub fn has_disease(&self) -> bool {
        self.label == Label::Positive
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.label {
            Label::Positive => write!(f, "The patient has {}.", self.disease),
            Label::Negative => write!(f, "The patient does NOT have {}.", self.disease),
        }
    }
}
