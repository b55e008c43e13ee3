//! SaaS Platform Configuration
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
    pub logging: LoggingConfig,
    pub identity: IdentityConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// "text" or "json"
    pub format: String,
    /// Default level filter when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            level: "info".to_string(),
        }
    }
}

/// Identity core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Additional caller ids treated as service accounts, on top of the
    /// built-in maintenance/service-client/webhook accounts.
    pub service_accounts: Vec<String>,

    /// `source` stamped on every stored event envelope
    pub event_source: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            service_accounts: Vec::new(),
            event_source: "platform:identity".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Reject values that would only fail later at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.format.to_ascii_lowercase().as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "logging.format must be 'text' or 'json', got '{}'",
                    other
                )))
            }
        }

        if self.identity.event_source.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "identity.event_source must not be empty".to_string(),
            ));
        }

        if let Some(blank) = self.identity.service_accounts.iter().find(|id| id.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "identity.service_accounts contains a blank id: '{}'",
                blank
            )));
        }

        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# SaaS Platform Configuration
# Environment variables (SAASPLAT_*) override these settings

[logging]
format = "text"  # text or json
level = "info"

[identity]
service_accounts = []
event_source = "platform:identity"
"#
        .to_string()
    }
}
