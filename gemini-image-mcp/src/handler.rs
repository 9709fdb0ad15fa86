//! Image tool handler.
//!
//! Runs a validated request through the adapter and the normalizer, and
//! writes the resulting image to disk when the caller asked for it.

use gemini_image_mcp_common::config::Config;
use gemini_image_mcp_common::error::Error;
use rmcp::model::Content;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::adapter;
use crate::gemini::{GeminiClient, GenerationBackend};
use crate::media::GeneratedImage;
use crate::normalize::normalize_response;
use crate::request::{
    DescribeImageRequest, EditImageRequest, GenerateImageRequest, ImageSize, ToolRequest,
};

/// Result of writing an image to the requested output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The image was written here
    Saved(PathBuf),
    /// The write failed; the generation itself still succeeded
    Failed { path: PathBuf, error: String },
}

/// A generated or edited image plus what the status line reports about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageToolOutput {
    pub image: GeneratedImage,
    /// Canonical model identifier
    pub model: &'static str,
    /// Resolution actually requested from the model, if it accepts one
    pub image_size: Option<ImageSize>,
    /// Text the model returned alongside the image
    pub model_text: String,
    pub saved: Option<SaveOutcome>,
}

impl ImageToolOutput {
    /// Human-readable status text that accompanies the image.
    pub fn status_text(&self) -> String {
        let resolution = self
            .image_size
            .map(|size| size.as_str().to_string())
            .unwrap_or_else(|| "default resolution".to_string());

        let mut lines = vec![format!("Generated image with {} ({})", self.model, resolution)];
        match &self.saved {
            Some(SaveOutcome::Saved(path)) => lines.push(format!("Saved to: {}", path.display())),
            Some(SaveOutcome::Failed { path, error }) => lines.push(format!(
                "Warning: could not save image to {}: {}",
                path.display(),
                error
            )),
            None => {}
        }
        let model_text = self.model_text.trim();
        if !model_text.is_empty() {
            lines.push(format!("Model response: {}", model_text));
        }
        lines.join("\n")
    }
}

/// Successful result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    Image(ImageToolOutput),
    Description(String),
}

impl ToolOutput {
    /// Convert into MCP content: `[image, status]` or `[text]`.
    pub fn into_content(self) -> Vec<Content> {
        match self {
            ToolOutput::Image(output) => {
                let status = output.status_text();
                vec![
                    Content::image(output.image.data, output.image.mime_type),
                    Content::text(status),
                ]
            }
            ToolOutput::Description(text) => vec![Content::text(text)],
        }
    }
}

/// Image tool handler.
pub struct ImageHandler {
    backend: Arc<dyn GenerationBackend>,
}

impl ImageHandler {
    /// Create a handler that talks to the Gemini API.
    #[instrument(level = "debug", name = "image_handler_new", skip_all)]
    pub fn new(config: Config) -> Self {
        debug!("Initializing ImageHandler");
        Self::with_backend(Arc::new(GeminiClient::new(config)))
    }

    /// Create a handler over an arbitrary backend.
    pub fn with_backend(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Run a validated request.
    pub async fn execute(&self, request: ToolRequest) -> Result<ToolOutput, Error> {
        match request {
            ToolRequest::Generate(req) => self.generate_image(req).await.map(ToolOutput::Image),
            ToolRequest::Edit(req) => self.edit_image(req).await.map(ToolOutput::Image),
            ToolRequest::Describe(req) => self.describe_image(req).await.map(ToolOutput::Description),
        }
    }

    /// Generate an image from a prompt and optional reference images.
    #[instrument(level = "info", name = "generate_image", skip(self, request), fields(model = request.model.id, aspect_ratio = %request.aspect_ratio, references = request.reference_images.len()))]
    pub async fn generate_image(&self, request: GenerateImageRequest) -> Result<ImageToolOutput, Error> {
        self.produce_image(ToolRequest::Generate(request)).await
    }

    /// Edit one or more input images according to a prompt.
    #[instrument(level = "info", name = "edit_image", skip(self, request), fields(model = request.model.id, images = request.images.len()))]
    pub async fn edit_image(&self, request: EditImageRequest) -> Result<ImageToolOutput, Error> {
        self.produce_image(ToolRequest::Edit(request)).await
    }

    /// Describe one or more images.
    #[instrument(level = "info", name = "describe_image", skip(self, request), fields(model = request.model.id, images = request.images.len()))]
    pub async fn describe_image(&self, request: DescribeImageRequest) -> Result<String, Error> {
        let request = ToolRequest::Describe(request);
        let response = adapter::invoke(self.backend.as_ref(), &request).await?;
        let description = normalize_response(&response)?.into_description()?;
        info!(chars = description.chars().count(), "Received description");
        Ok(description)
    }

    async fn produce_image(&self, request: ToolRequest) -> Result<ImageToolOutput, Error> {
        let response = adapter::invoke(self.backend.as_ref(), &request).await?;
        let (image, model_text) = normalize_response(&response)?.into_image()?;
        info!(
            mime_type = %image.mime_type,
            bytes = image.approx_size(),
            "Received image"
        );

        let model = request.model();
        let image_size = match &request {
            ToolRequest::Generate(req) => Some(req.image_size),
            ToolRequest::Edit(req) => Some(req.image_size),
            ToolRequest::Describe(_) => None,
        }
        .filter(|_| model.image_config.supports_image_size());

        let saved = match request.output_path() {
            Some(path) => Some(save_image(&image, path).await),
            None => None,
        };

        Ok(ImageToolOutput {
            image,
            model: model.id,
            image_size,
            model_text,
            saved,
        })
    }
}

/// Decode an image and write it to `path`, creating parent directories.
///
/// Failures are logged and reported, never returned as errors.
pub async fn save_image(image: &GeneratedImage, path: &Path) -> SaveOutcome {
    match write_image(image, path).await {
        Ok(()) => {
            info!(path = %path.display(), "Saved image");
            SaveOutcome::Saved(path.to_path_buf())
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to save image");
            SaveOutcome::Failed {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        }
    }
}

async fn write_image(image: &GeneratedImage, path: &Path) -> Result<(), Error> {
    let data = image
        .decode()
        .map_err(|e| Error::generation(format!("Invalid base64 data from model: {}", e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &data).await?;
    Ok(())
}
