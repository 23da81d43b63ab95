//! On-disk model artifacts.
//!
//! An artifact is a JSON document naming the feature order the model was
//! fitted on and the fitted model itself:
//!
//! ```json
//! {
//!   "name": "heart-failure-rf",
//!   "feature_names": ["age", "anaemia", "..."],
//!   "model": { "kind": "random_forest", "n_features": 12, "trees": [...] }
//! }
//! ```
//!
//! Loading checks `feature_names` against [`FIELD_NAMES`] so that a model
//! fitted on a different column order is refused before it can score.

use std::fs::read_to_string;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::fields::FIELD_NAMES;
use crate::forest::RandomForest;
use crate::logistic::LogisticModel;
use crate::scorer::Scorer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    RandomForest(RandomForest),
    Logistic(LogisticModel),
}

impl ModelSpec {
    fn n_features(&self) -> usize {
        match self {
            ModelSpec::RandomForest(forest) => forest.n_features(),
            ModelSpec::Logistic(lr) => lr.n_features(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub feature_names: Vec<String>,

    pub model: ModelSpec,
}

impl ModelArtifact {
    /// The feature-order contract. Model structure is already checked when
    /// the model is deserialised.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.feature_names != FIELD_NAMES {
            return Err(LoadError::FeatureOrderMismatch {
                expected: FIELD_NAMES.iter().map(|s| s.to_string()).collect(),
                found: self.feature_names.clone(),
            });
        }
        let width = self.model.n_features();
        if width != self.feature_names.len() {
            return Err(LoadError::Invalid(format!(
                "model takes {width} features but {} feature names are listed",
                self.feature_names.len()
            )));
        }
        Ok(())
    }

    pub fn into_scorer(self) -> Arc<dyn Scorer> {
        match self.model {
            ModelSpec::RandomForest(forest) => Arc::new(forest.with_name(self.name)),
            ModelSpec::Logistic(lr) => Arc::new(lr.with_name(self.name)),
        }
    }
}

/// Parse and validate an artifact from JSON text.
pub fn parse_artifact(text: &str) -> Result<ModelArtifact, LoadError> {
    let artifact = serde_json::from_str::<ModelArtifact>(text)?;
    artifact.validate()?;
    Ok(artifact)
}

/// Read, parse and validate an artifact file.
pub fn load_artifact(path: impl AsRef<Path>) -> Result<ModelArtifact, LoadError> {
    let path = path.as_ref();
    let text = read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_artifact(&text)
}

/// Load the process-wide scorer from an artifact file.
pub fn load_scorer(path: impl AsRef<Path>) -> Result<Arc<dyn Scorer>, LoadError> {
    let path = path.as_ref();
    let artifact = load_artifact(path)?;
    let scorer = artifact.into_scorer();
    log::info!(
        "loaded {} model '{}' from {}",
        scorer.kind(),
        scorer.name(),
        path.display()
    );
    Ok(scorer)
}
