//! The scoring capability.
//!
//! A [`Scorer`] is a fitted binary classifier over the fixed-order feature
//! row of a [`PatientRecord`]. Implementations only provide `predict` and
//! `predict_proba`; [`Scorer::score`] runs both and checks what comes back.

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::fields::FIELD_COUNT;
use crate::record::PatientRecord;

/// Tolerance on `p0 + p1 == 1`.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Outcome of scoring one record. Lives only for the render that shows it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 0 = low risk, 1 = high risk.
    pub label: u8,
    /// `[p_no_failure, p_failure]`.
    pub probabilities: [f64; 2],
}

impl PredictionResult {
    pub fn is_high_risk(&self) -> bool {
        self.label == 1
    }
}

/// Trait for fitted heart-failure classifiers
pub trait Scorer: Send + Sync {
    fn name(&self) -> &str;

    /// Backend identifier, e.g. `random_forest`
    fn kind(&self) -> &str;

    /// Width of the feature row the model was fitted on
    fn n_features(&self) -> usize;

    /// Class distribution `[p0, p1]` for one feature row
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ScoreError>;

    /// Class label for one feature row. Defaults to the most probable class,
    /// ties going to class 0.
    fn predict(&self, features: &[f64]) -> Result<u8, ScoreError> {
        let [p0, p1] = self.predict_proba(features)?;
        Ok(u8::from(p1 > p0))
    }

    /// Score a record: label plus a checked probability pair.
    fn score(&self, record: &PatientRecord) -> Result<PredictionResult, ScoreError> {
        let expected = self.n_features();
        if expected != FIELD_COUNT {
            return Err(ScoreError::ShapeMismatch {
                expected,
                got: FIELD_COUNT,
            });
        }
        let row = record.to_features();
        let label = self.predict(&row)?;
        if label > 1 {
            return Err(ScoreError::InvalidLabel(label));
        }
        let probabilities = normalize_pair(self.predict_proba(&row)?)?;
        log::debug!(
            "{} scored record: label={label} p=[{:.4}, {:.4}]",
            self.name(),
            probabilities[0],
            probabilities[1]
        );
        Ok(PredictionResult {
            label,
            probabilities,
        })
    }
}

/// Check a feature row against the expected width and reject NaN/inf.
pub fn check_row(features: &[f64], expected: usize) -> Result<(), ScoreError> {
    if features.len() != expected {
        return Err(ScoreError::ShapeMismatch {
            expected,
            got: features.len(),
        });
    }
    match features.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(ScoreError::NonFinite { index }),
        None => Ok(()),
    }
}

/// Accept a probability pair that is finite, non-negative and sums to one
/// within [`PROBABILITY_TOLERANCE`]; the result is renormalised exactly.
pub fn normalize_pair([p0, p1]: [f64; 2]) -> Result<[f64; 2], ScoreError> {
    let valid = p0.is_finite() && p1.is_finite() && p0 >= 0.0 && p1 >= 0.0;
    let sum = p0 + p1;
    if !valid || (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(ScoreError::InvalidDistribution(p0, p1));
    }
    Ok([p0 / sum, p1 / sum])
}
