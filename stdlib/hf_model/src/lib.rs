//! Heart-failure risk model.
//!
//! Defines the twelve bounded input fields and the [`PatientRecord`] they
//! collect into, the [`Scorer`] capability, and the JSON model artifacts
//! (random forest, logistic) that implement it.

pub mod artifact;
pub mod error;
pub mod fields;
pub mod forest;
pub mod logistic;
pub mod record;
pub mod scorer;

pub use artifact::{load_artifact, load_scorer, parse_artifact, ModelArtifact, ModelSpec};
pub use error::{LoadError, ScoreError};
pub use fields::{
    collect, field, Control, FieldKind, FieldSpec, FormState, FIELDS, FIELD_COUNT, FIELD_NAMES,
};
pub use forest::{Node, RandomForest, Tree};
pub use logistic::LogisticModel;
pub use record::PatientRecord;
pub use scorer::{PredictionResult, Scorer};
