//! Tracing initialization.
//!
//! Logs are written to stderr: in stdio mode stdout carries the MCP
//! JSON-RPC stream and must not be interleaved with log lines.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls the log level and filtering. Examples:
//!   - `RUST_LOG=debug` - Enable debug logging for all modules
//!   - `RUST_LOG=gemini_image_mcp=debug` - Enable debug for the server crate
//!   - `RUST_LOG=warn,gemini_image_mcp_common=debug` - Warn by default, debug for common

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn subscriber(default_level: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt_layer)
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
///
/// # Example
///
/// ```no_run
/// use gemini_image_mcp_common::tracing::init_tracing;
///
/// init_tracing("info");
/// tracing::info!("Server starting");
/// ```
pub fn init_tracing(default_level: &str) {
    subscriber(default_level).init();
}

/// Try to initialize tracing, returning `false` if a subscriber was already set.
///
/// Useful from tests, where several cases may race to install a subscriber.
pub fn try_init_tracing(default_level: &str) -> bool {
    subscriber(default_level).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_tracing_does_not_panic() {
        let _ = try_init_tracing(DEFAULT_LOG_LEVEL);
        // A second install always reports the existing subscriber.
        assert!(!try_init_tracing(DEFAULT_LOG_LEVEL));
    }

    #[test]
    fn test_env_filter_parses_module_specific() {
        let filter = EnvFilter::new("warn,gemini_image_mcp=debug");
        drop(filter);
    }
}
