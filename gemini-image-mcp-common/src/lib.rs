//! Gemini Image MCP Common Library
//!
//! Shared configuration, error types, the Gemini image model table, tracing
//! setup and MCP server plumbing for the Gemini image MCP server.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod tracing;
pub mod transport;

#[cfg(test)]
mod error_test;

pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use models::{GeminiImageModel, ImageConfigShape, ModelRegistry};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
