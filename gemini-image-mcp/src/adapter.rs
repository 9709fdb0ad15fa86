//! Translation of validated tool requests into `generateContent` calls.
//!
//! Every request becomes a single user turn: input images first, in caller
//! order, followed by the prompt text. The model's [`ImageConfigShape`] alone
//! decides which `imageConfig` keys are sent.

use gemini_image_mcp_common::error::Error;
use gemini_image_mcp_common::models::ImageConfigShape;
use tracing::debug;

use crate::gemini::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationBackend, GenerationConfig,
    ImageConfig, Part,
};
use crate::media::MediaPart;
use crate::request::{AspectRatio, ImageSize, ToolRequest};

/// Modalities requested from the model when an image is expected.
pub const IMAGE_MODALITIES: [&str; 2] = ["TEXT", "IMAGE"];

/// Modalities requested for describe calls.
pub const TEXT_MODALITIES: [&str; 1] = ["TEXT"];

/// A ready-to-send upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamCall {
    /// Canonical model identifier
    pub model: &'static str,
    /// Request body
    pub request: GenerateContentRequest,
}

/// Build the upstream call for a validated request.
pub fn build_request(request: &ToolRequest) -> UpstreamCall {
    let model = request.model();
    let shape = model.image_config;

    let (media, prompt, modalities, image_config) = match request {
        ToolRequest::Generate(req) => (
            req.reference_images.as_slice(),
            req.prompt.as_str(),
            &IMAGE_MODALITIES[..],
            image_config(shape, Some(req.aspect_ratio), Some(req.image_size)),
        ),
        ToolRequest::Edit(req) => (
            req.images.as_slice(),
            req.prompt.as_str(),
            &IMAGE_MODALITIES[..],
            image_config(shape, None, Some(req.image_size)),
        ),
        ToolRequest::Describe(req) => (
            req.images.as_slice(),
            req.prompt.as_str(),
            &TEXT_MODALITIES[..],
            None,
        ),
    };

    let parts: Vec<Part> = media
        .iter()
        .cloned()
        .chain(std::iter::once(MediaPart::text(prompt)))
        .map(Part::from)
        .collect();

    UpstreamCall {
        model: model.id,
        request: GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: modalities.iter().map(|m| m.to_string()).collect(),
                image_config,
            }),
        },
    }
}

/// The `imageConfig` block for a model shape.
///
/// `None` means the key is omitted entirely, never sent empty.
pub fn image_config(
    shape: ImageConfigShape,
    aspect_ratio: Option<AspectRatio>,
    image_size: Option<ImageSize>,
) -> Option<ImageConfig> {
    let config = match shape {
        ImageConfigShape::Full => ImageConfig {
            aspect_ratio: aspect_ratio.map(|r| r.as_str().to_string()),
            image_size: image_size.map(|s| s.as_str().to_string()),
        },
        ImageConfigShape::AspectRatioOnly => ImageConfig {
            aspect_ratio: aspect_ratio.map(|r| r.as_str().to_string()),
            image_size: None,
        },
        ImageConfigShape::Unsupported => return None,
    };

    if config.aspect_ratio.is_none() && config.image_size.is_none() {
        None
    } else {
        Some(config)
    }
}

/// Build and send the upstream call for a validated request.
pub async fn invoke(
    backend: &dyn GenerationBackend,
    request: &ToolRequest,
) -> Result<GenerateContentResponse, Error> {
    let call = build_request(request);
    debug!(
        model = call.model,
        parts = call.request.contents.iter().map(|c| c.parts.len()).sum::<usize>(),
        "Invoking model"
    );
    backend.generate_content(call.model, &call.request).await
}
