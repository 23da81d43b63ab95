//! Heart-failure risk predictor web service.
//!
//! Serves the patient form, scores submissions with the model loaded at
//! startup, and renders the verdict and probability charts.

pub mod config;
pub mod error;
pub mod routes;

pub use config::{AppConfig, ConfigError, Overrides};
pub use error::{AppError, StartupError};
pub use routes::{router, AppState};

/// Load the model named by `config` and build the shared state around it.
pub fn build_state(config: &AppConfig) -> Result<AppState, StartupError> {
    let scorer = hf_model::load_scorer(&config.model.path)?;
    Ok(AppState::new(scorer, config.ui.title.as_str()))
}
