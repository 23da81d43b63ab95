use serde::{Deserialize, Serialize};

use hf_model::PredictionResult;

/// Binary risk verdict derived from the scorer's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Low,
    High,
}

impl Verdict {
    /// Label 1 is high risk; any other label is low risk.
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Verdict::High
        } else {
            Verdict::Low
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Verdict::Low => "Low Risk of Heart Failure",
            Verdict::High => "High Risk of Heart Failure",
        }
    }

    /// Alert style applied to the verdict banner.
    pub fn css_class(&self) -> &'static str {
        match self {
            Verdict::Low => "alert alert-success",
            Verdict::High => "alert alert-error",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Verdict::Low => "✅",
            Verdict::High => "⚠️",
        }
    }
}

impl From<&PredictionResult> for Verdict {
    fn from(result: &PredictionResult) -> Self {
        Verdict::from_label(result.label)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Low => write!(f, "Low Risk"),
            Verdict::High => write!(f, "High Risk"),
        }
    }
}
