//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError, LedgerBackend};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "idm.toml",
    "config.toml",
    "./config/idm.toml",
    "/etc/idm/config.toml",
];

/// Configuration loader
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found), apply environment overrides, validate.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match self.find_config_file() {
            Some(path) => {
                info!(?path, "Loading configuration from file");
                AppConfig::from_file(&path)?
            }
            None => AppConfig::default(),
        };

        apply_env_overrides(&mut config, |key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!(?path, "Configured config file does not exist, searching defaults");
        }

        if let Ok(path) = env::var("IDM_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

/// Apply `IDM_*` overrides using the given variable lookup.
fn apply_env_overrides<F>(config: &mut AppConfig, var: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(val) = var("IDM_HTTP_HOST") {
        config.http.host = val;
    }
    if let Some(val) = var("IDM_HTTP_PORT") {
        config.http.port = val.parse().map_err(|_| {
            ConfigError::ValidationError(format!("IDM_HTTP_PORT is not a port number: '{}'", val))
        })?;
    }
    if let Some(val) = var("IDM_CORS_ORIGINS") {
        config.http.cors_origins = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // Ledger
    if let Some(val) = var("IDM_LEDGER_BACKEND") {
        config.ledger.backend = LedgerBackend::parse(&val)?;
    }
    if let Some(val) = var("IDM_SQLITE_URL") {
        config.ledger.sqlite_url = val;
    }

    if let Some(val) = var("IDM_DEV_MODE") {
        config.dev_mode = val == "true" || val == "1";
    }

    Ok(())
}
