//! Configuration file parser for ~/.config/headlines/config.toml.
//!
//! The config file is optional. A missing file yields `Config::default()`.
//! Unknown keys are accepted by serde, though we log a warning for each one
//! since they are usually typos.
use crate::news::{NewsApiSettings, DEFAULT_BASE_URL};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the news API key. Takes precedence over `api_key`.
pub const API_KEY_ENV: &str = "NEWS_API_KEY";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("No news API key: set NEWS_API_KEY or api_key in the config file")]
    MissingApiKey,
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Debug output masks `api_key`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// News API key (alternative to the NEWS_API_KEY env var).
    pub api_key: Option<String>,

    /// Two-letter country code sent with every request.
    pub country: String,

    /// API root; `/top-headlines` is appended.
    pub base_url: String,

    /// Initial theme: "dark" or "light".
    pub theme: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            country: "us".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            theme: "light".to_string(),
            request_timeout_secs: 15,
            keybindings: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("country", &self.country)
            .field("base_url", &self.base_url)
            .field("theme", &self.theme)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("keybindings", &self.keybindings)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "api_key",
        "country",
        "base_url",
        "theme",
        "request_timeout_secs",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            country = %config.country,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Pick the API key: a non-empty env value wins over the config file.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<SecretString, ConfigError> {
        let from_env = env_value.filter(|v| !v.trim().is_empty());
        if from_env.is_some() {
            tracing::debug!("Using news API key from {}", API_KEY_ENV);
        }
        from_env
            .or_else(|| self.api_key.clone().filter(|v| !v.trim().is_empty()))
            .map(|key| SecretString::from(key.trim().to_string()))
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Client settings for this config and a resolved key.
    pub fn news_settings(&self, api_key: SecretString) -> NewsApiSettings {
        NewsApiSettings {
            api_key,
            base_url: self.base_url.clone(),
            country: self.country.trim().to_lowercase(),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
