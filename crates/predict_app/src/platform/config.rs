use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use predict_core::DomainCatalog;
use predict_engine::FetchSettings;
use predict_logging::predict_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "./predict.ron";
pub const ENV_BACKEND_URL: &str = "PREDICT_BACKEND_URL";
pub const ENV_TOKEN: &str = "PREDICT_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub bearer_token: Option<String>,
    pub log_destination: LogDestination,
    pub request_timeout_secs: u64,
    /// Replaces the built-in domains when present.
    pub domains: Option<DomainCatalog>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            backend_url: fetch.base_url,
            bearer_token: None,
            log_destination: LogDestination::default(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            domains: None,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `./predict.ron` when none is given.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        predict_info!("loaded config from {:?}", path);
        Ok(config)
    }

    /// Applies `PREDICT_BACKEND_URL` and `PREDICT_TOKEN`; blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = non_blank(ENV_BACKEND_URL) {
            self.backend_url = url;
        }
        if let Some(token) = non_blank(ENV_TOKEN) {
            self.bearer_token = Some(token);
        }
        self
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn catalog(&self) -> DomainCatalog {
        self.domains.clone().unwrap_or_else(DomainCatalog::builtin)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.backend_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            ..FetchSettings::default()
        }
    }
}
