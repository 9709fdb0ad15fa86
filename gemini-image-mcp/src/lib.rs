//! Gemini Image MCP Server Library
//!
//! Exposes `generate_image`, `edit_image` and `describe_image` MCP tools backed
//! by Gemini image models. A tool call flows through
//! [`request`] (validation) → [`adapter`] (request building and the upstream
//! call) → [`normalize`] (response reduction) and is wrapped into a tool
//! result by [`server::ImageServer`].

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod adapter;
pub mod gemini;
pub mod handler;
pub mod media;
pub mod normalize;
pub mod request;
pub mod resources;
pub mod server;

pub use gemini::{GeminiClient, GenerationBackend};
pub use handler::{ImageHandler, ImageToolOutput, SaveOutcome, ToolOutput};
pub use media::{GeneratedImage, ImageInput, MediaPart};
pub use normalize::GenerationOutcome;
pub use request::{
    AspectRatio, DescribeImageRequest, EditImageRequest, GenerateImageRequest, ImageSize,
    ToolKind, ToolRequest, ValidationError,
};
pub use server::ImageServer;
