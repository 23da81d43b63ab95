//! Server configuration loaded from `hf_server.toml`.
//!
//! Every key has a default, so an empty or absent file yields a working
//! configuration. Command-line flags are applied on top through
//! [`Overrides`].

use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "hf_server.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot resolve listen address {0}")]
    InvalidAddress(String),

    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    /// Path of the model artifact, relative to the working directory
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSection {
    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub ui: UiSection,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8710
}
fn default_model_path() -> PathBuf {
    PathBuf::from("models/heart_failure_rf.json")
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_title() -> String {
    "Heart Failure Risk Predictor".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl AppConfig {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<AppConfig>(text)
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
    /// the working directory is used when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    return Ok(Self::default());
                }
                p
            }
        };
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(model) = &overrides.model {
            self.model.path = model.clone();
        }
        if let Some(host) = &overrides.host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.server.host.as_str();
        let display = format!("{host}:{}", self.server.port);
        (host, self.server.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or(ConfigError::InvalidAddress(display))
    }

    /// Configured level, raised one step per `verbose` count.
    pub fn log_filter(&self, verbose: u8) -> Result<LevelFilter, ConfigError> {
        const LEVELS: [LevelFilter; 6] = [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
            LevelFilter::Trace,
        ];
        let base = self
            .log
            .level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log.level.clone()))?;
        let idx = LEVELS.iter().position(|l| *l == base).unwrap_or(3);
        Ok(LEVELS[(idx + verbose as usize).min(LEVELS.len() - 1)])
    }
}
