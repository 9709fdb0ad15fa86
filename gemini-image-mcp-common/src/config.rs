//! Configuration module for loading environment variables and settings.

use crate::error::ConfigError;
use std::fmt;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable overriding the Gemini API base URL.
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Gemini API key (required)
    pub api_key: String,
    /// Base URL of the Gemini API, without a trailing slash
    pub base_url: String,
    /// HTTP server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnvVar` if GEMINI_API_KEY is not set or is blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::missing_env_var(API_KEY_ENV))?;

        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::invalid_value("PORT", format!("'{}' is not a port number", raw)))?,
            Err(_) => 8080,
        };

        Ok(Self::new(api_key, base_url, port))
    }

    /// Build a configuration from explicit values.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, port: u16) -> Self {
        let base_url = base_url.into();
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            port,
        }
    }

    /// Get the `generateContent` endpoint URL for a model.
    pub fn generate_content_endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("port", &self.port)
            .finish()
    }
}
