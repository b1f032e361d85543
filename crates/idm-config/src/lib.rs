//! IDM Configuration System
//!
//! TOML-based configuration with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub ledger: LedgerConfig,

    /// Enable development mode
    pub dev_mode: bool,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Which ledger store backs the Person aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    /// Process-local map, lost on restart
    Memory,
    /// SQLite file (or `sqlite::memory:`)
    Sqlite,
}

impl LedgerBackend {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::ValidationError(format!(
                "unknown ledger backend '{}', expected 'memory' or 'sqlite'",
                other
            ))),
        }
    }
}

/// Ledger store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub backend: LedgerBackend,
    pub sqlite_url: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::Memory,
            sqlite_url: "sqlite://./data/idm-ledger.db?mode=rwc".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::ValidationError("http.port must not be 0".to_string()));
        }
        if self.ledger.backend == LedgerBackend::Sqlite
            && self.ledger.sqlite_url.trim().is_empty()
        {
            return Err(ConfigError::ValidationError(
                "ledger.sqlite_url is required for the sqlite backend".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# IDM Configuration
# Environment variables (IDM_*) override these settings

[http]
port = 8080
host = "0.0.0.0"
cors_origins = []

[ledger]
backend = "memory"  # memory or sqlite
sqlite_url = "sqlite://./data/idm-ledger.db?mode=rwc"

dev_mode = false
"#
        .to_string()
    }
}
