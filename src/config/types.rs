//! Core configuration types and loading.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::notify::Color;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/roomcast/config.yaml";

/// Main configuration structure for roomcast.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the room notification API.
    pub api_url: String,
    /// Ordered list of named room credentials. When two entries share a
    /// name, the first one wins at lookup time.
    pub authentications: Vec<AuthConfig>,
    /// Default request options, overridable per invocation.
    #[serde(default)]
    pub defaults: NotifyDefaults,
    /// HTTP client tuning.
    #[serde(default)]
    pub http: HttpConfig,
}

/// One named credential as it appears in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Human-readable room name jobs refer to.
    pub name: String,
    /// API token (supports `${ENV_VAR}` substitution).
    pub token: String,
    /// Actual room id on the chat service.
    pub room: String,
}

/// Default request options applied when the invocation leaves them unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyDefaults {
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub notify: bool,
    #[serde(default)]
    pub html: bool,
    #[serde(default)]
    pub from: String,
}

/// HTTP client timeouts.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub read_timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    3000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_timeout_ms(),
            read_timeout_ms: default_timeout_ms(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Config {
    /// Load the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Validate the configuration, collecting every error found.
    ///
    /// Duplicate authentication names are allowed (first match wins), but
    /// empty fields never are - a blank token or room id would only fail
    /// later with a confusing API error.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if self.api_url.trim().is_empty() {
            errors.push(ConfigError::ValidationError(
                "api_url must not be empty".to_string(),
            ));
        } else if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            errors.push(ConfigError::ValidationError(format!(
                "invalid api_url scheme: {}",
                self.api_url
            )));
        }

        for auth in &self.authentications {
            if auth.name.is_empty() {
                errors.push(ConfigError::InvalidAuthentication {
                    name: auth.name.clone(),
                    message: "name must not be empty".to_string(),
                });
            }
            if auth.token.is_empty() {
                errors.push(ConfigError::InvalidAuthentication {
                    name: auth.name.clone(),
                    message: "token must not be empty".to_string(),
                });
            }
            if auth.room.is_empty() {
                errors.push(ConfigError::InvalidAuthentication {
                    name: auth.name.clone(),
                    message: "room must not be empty".to_string(),
                });
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
