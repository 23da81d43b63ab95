use std::path::PathBuf;

use thiserror::Error;

/// Failure to bring a model artifact into memory. Always fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model expects features {found:?}, but records are laid out as {expected:?}")]
    FeatureOrderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("invalid model: {0}")]
    Invalid(String),
}

/// Failure while scoring a single record. Fatal to the current request only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("shape mismatch: model expects {expected} features, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("non-finite feature value at index {index}")]
    NonFinite { index: usize },

    #[error("scorer returned label {0}, expected 0 or 1")]
    InvalidLabel(u8),

    #[error("scorer returned an invalid probability pair [{0}, {1}]")]
    InvalidDistribution(f64, f64),
}
