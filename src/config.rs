//! Application configuration.
//!
//! Loaded from an optional TOML file; `STOREFRONT_API_URL` then overrides the backend
//! URL. Missing keys take their defaults, so an empty file is a valid configuration.
//!
//! ```toml
//! server_api_url = "http://localhost:8080/"
//! request_timeout_secs = 10
//! channel_buffer = 32
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const API_URL_ENV: &str = "STOREFRONT_API_URL";

/// Errors related to loading and validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {message}")]
    CannotRead { path: String, message: String },

    /// TOML could not be parsed into the expected structure.
    #[error("toml error: {0}")]
    CannotParseToml(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Base URL every resource path is resolved against.
    pub server_api_url: String,
    /// Per-request timeout. Unset means requests wait indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// Capacity of each gateway's request channel.
    pub channel_buffer: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_api_url: "http://localhost:8080/".to_string(),
            request_timeout_secs: None,
            channel_buffer: 32,
        }
    }
}

impl AppConfig {
    pub fn from_toml(config_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(config_str).map_err(|e| ConfigError::CannotParseToml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` if given (defaults otherwise), then applies the environment override.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| ConfigError::CannotRead {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        config.with_env_override(std::env::var(API_URL_ENV).ok())
    }

    /// Replaces the API URL when `url` is set and non-blank.
    pub fn with_env_override(self, url: Option<String>) -> Result<Self, ConfigError> {
        match url.filter(|u| !u.trim().is_empty()) {
            Some(url) => self.with_api_url(url),
            None => Ok(self),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        self.server_api_url = url.into();
        self.validate()?;
        Ok(self)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_api_url.starts_with("http://") || self.server_api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "server_api_url must be an http(s) URL, got {:?}",
                self.server_api_url
            )));
        }
        if self.channel_buffer == 0 {
            return Err(ConfigError::Invalid("channel_buffer must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_means_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn reads_every_key() {
        let config = AppConfig::from_toml(
            r#"
            server_api_url = "https://shop.example.com/"
            request_timeout_secs = 5
            channel_buffer = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.server_api_url, "https://shop.example.com/");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.channel_buffer, 8);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_toml("channel_buffer = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("server_api_url = \"ftp://x\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("unknown = 1"),
            Err(ConfigError::CannotParseToml(_))
        ));
    }

    #[test]
    fn environment_overrides_the_url() {
        let config = AppConfig::default()
            .with_env_override(Some("http://api:9000/".into()))
            .unwrap();
        assert_eq!(config.server_api_url, "http://api:9000/");

        let unchanged = AppConfig::default().with_env_override(Some("  ".into())).unwrap();
        assert_eq!(unchanged, AppConfig::default());
    }
}
