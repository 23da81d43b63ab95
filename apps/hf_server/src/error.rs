//! Error types and HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use hf_model::{LoadError, ScoreError};

use crate::config::ConfigError;

/// Failures that stop the process before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Model(#[from] LoadError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Request-level error for the JSON API.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("scoring failed: {0}")]
    Score(#[from] ScoreError),
}

/// JSON body returned on error.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Score(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log::error!("{self}");
        let body = ErrorBody {
            error: self.to_string(),
            code: status.as_u16(),
        };
        (status, axum::Json(body)).into_response()
    }
}
