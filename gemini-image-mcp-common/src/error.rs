//! Error types for the Gemini image MCP server.
//!
//! # Error Categories
//!
//! - `Error::Validation`: malformed or out-of-bounds tool arguments
//! - `Error::Generation`: the model answered but produced nothing usable
//! - `Error::Api`: the upstream call itself failed (HTTP, network, parsing)
//! - `Error::Dispatch`: unknown tool name
//! - `Error::Io`: file system operations
//! - `ConfigError`: missing or invalid startup configuration

use thiserror::Error;

/// Unified error type for tool invocations.
///
/// Everything except `Config` is recoverable at the tool boundary and is
/// reported back to the host as an error-shaped tool result.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input validation errors, raised before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// The upstream model returned no usable candidate, content or image
    #[error("Generation error: {0}")]
    Generation(String),

    /// API errors with endpoint and HTTP status context
    ///
    /// A status code of 0 means no HTTP response was received.
    #[error("API error for {endpoint} (HTTP {status_code}): {message}")]
    Api {
        /// The API endpoint that was called
        endpoint: String,
        /// HTTP status code returned by the API
        status_code: u16,
        /// Error message from the API or describing the failure
        message: String,
    },

    /// The requested tool does not exist
    #[error("Unknown tool: {0}")]
    Dispatch(String),

    /// File system I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new API error with endpoint, status code, and message.
    ///
    /// # Example
    ///
    /// ```
    /// use gemini_image_mcp_common::error::Error;
    ///
    /// let err = Error::api(
    ///     "https://generativelanguage.googleapis.com/v1beta/models/x:generateContent",
    ///     429,
    ///     "Resource has been exhausted"
    /// );
    /// assert!(err.to_string().contains("429"));
    /// ```
    pub fn api(endpoint: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```
    /// use gemini_image_mcp_common::error::Error;
    ///
    /// let err = Error::validation("images required");
    /// assert!(err.to_string().contains("images required"));
    /// ```
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create a new generation error.
    pub fn generation(message: impl Into<String>) -> Self {
        Error::Generation(message.into())
    }

    /// Create a generation error that carries extra detail from the response,
    /// such as the model's explanation for refusing to draw.
    ///
    /// Blank detail is dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use gemini_image_mcp_common::error::Error;
    ///
    /// let err = Error::generation_with_detail("no image generated", "I can't draw that.");
    /// assert!(err.to_string().contains("no image generated"));
    /// assert!(err.to_string().contains("I can't draw that."));
    /// ```
    pub fn generation_with_detail(message: impl Into<String>, detail: impl AsRef<str>) -> Self {
        let message = message.into();
        let detail = detail.as_ref().trim();
        if detail.is_empty() {
            Error::Generation(message)
        } else {
            Error::Generation(format!("{}: {}", message, detail))
        }
    }

    /// Create a new unknown-tool error.
    pub fn dispatch(tool: impl Into<String>) -> Self {
        Error::Dispatch(tool.into())
    }

    /// Whether this error was raised before any upstream call was made.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Dispatch(_))
    }
}

/// Configuration errors.
///
/// These are fatal at startup: the server does not run without a credential.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
