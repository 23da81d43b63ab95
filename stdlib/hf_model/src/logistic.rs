use serde::{Deserialize, Serialize};

use crate::error::{LoadError, ScoreError};
use crate::scorer::{check_row, Scorer};

#[derive(Deserialize)]
struct LogisticDef {
    weights: Vec<f64>,
    bias: f64,
}

/// Logistic model over the raw feature row: `p1 = sigmoid(w·x + b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LogisticDef")]
pub struct LogisticModel {
    weights: Vec<f64>,
    bias: f64,
    #[serde(skip)]
    name: String,
}

impl TryFrom<LogisticDef> for LogisticModel {
    type Error = LoadError;

    fn try_from(def: LogisticDef) -> Result<Self, LoadError> {
        LogisticModel::new(String::new(), def.weights, def.bias)
    }
}

impl LogisticModel {
    pub fn new(name: impl Into<String>, weights: Vec<f64>, bias: f64) -> Result<Self, LoadError> {
        let model = Self {
            weights,
            bias,
            name: name.into(),
        };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    fn validate(&self) -> Result<(), LoadError> {
        if self.weights.is_empty() {
            return Err(LoadError::Invalid("logistic model has no weights".into()));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(LoadError::Invalid(
                "logistic model has non-finite coefficients".into(),
            ));
        }
        Ok(())
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Scorer for LogisticModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "logistic"
    }

    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ScoreError> {
        check_row(features, self.weights.len())?;
        let z = self
            .weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        let p1 = sigmoid(z);
        Ok([1.0 - p1, p1])
    }

    /// Class 1 only on a strictly positive margin; even odds go to class 0.
    fn predict(&self, features: &[f64]) -> Result<u8, ScoreError> {
        let [_, p1] = self.predict_proba(features)?;
        Ok(u8::from(p1 > 0.5))
    }
}
