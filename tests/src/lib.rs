//! Shared fixtures for the end-to-end tests.

use hf_model::{PatientRecord, ScoreError, Scorer, FIELD_COUNT, FIELD_NAMES};
use std::sync::Mutex;

/// Scorer returning a canned label and probability pair, recording every row
/// it was asked to score.
pub struct CannedScorer {
    label: u8,
    probabilities: [f64; 2],
    seen: Mutex<Vec<Vec<f64>>>,
}

impl CannedScorer {
    pub fn new(label: u8, probabilities: [f64; 2]) -> Self {
        Self {
            label,
            probabilities,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Rows passed to `predict`, in call order.
    pub fn seen(&self) -> Vec<Vec<f64>> {
        self.seen.lock().map(|rows| rows.clone()).unwrap_or_default()
    }
}

impl Scorer for CannedScorer {
    fn name(&self) -> &str {
        "canned"
    }

    fn kind(&self) -> &str {
        "stub"
    }

    fn n_features(&self) -> usize {
        FIELD_COUNT
    }

    fn predict_proba(&self, _features: &[f64]) -> Result<[f64; 2], ScoreError> {
        Ok(self.probabilities)
    }

    fn predict(&self, features: &[f64]) -> Result<u8, ScoreError> {
        if let Ok(mut rows) = self.seen.lock() {
            rows.push(features.to_vec());
        }
        Ok(self.label)
    }
}

/// The all-defaults record as a `name -> value` JSON object.
pub fn defaults_json() -> serde_json::Value {
    let values = PatientRecord::default().to_features();
    let map = FIELD_NAMES
        .iter()
        .zip(values)
        .map(|(name, v)| (name.to_string(), serde_json::json!(v)))
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(map)
}
