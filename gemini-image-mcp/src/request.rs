//! Tool argument types and request validation.
//!
//! The host sends an untyped JSON object per tool call. Required fields are
//! checked on the raw object first, then it is deserialized into a
//! `*ToolParams` wrapper with every field optional, then validated
//! into a typed [`ToolRequest`]. Checks run in a fixed order and stop at the
//! first failure:
//!
//! 1. required fields (`prompt`, `images`)
//! 2. array bounds
//! 3. enum membership (`model`, `aspectRatio`, `imageSize`)
//! 4. image entries (MIME type and base64 payload)
//!
//! Defaults are applied last. Nothing here touches the network or disk.

use crate::media::{ImageInput, MediaPart};
use gemini_image_mcp_common::error::Error;
use gemini_image_mcp_common::models::{GeminiImageModel, ModelRegistry};
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Maximum number of images accepted in `referenceImages` or edit `images`.
pub const MAX_IMAGES: usize = 14;

/// Prompt used by `describe_image` when none is given.
pub const DEFAULT_DESCRIBE_PROMPT: &str = "Describe this image in detail.";

// =============================================================================
// Enumerations
// =============================================================================

/// Aspect ratio of a generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    TallPortrait,
    #[serde(rename = "16:9")]
    Widescreen,
}

impl AspectRatio {
    /// All supported aspect ratios.
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::TallPortrait,
        AspectRatio::Widescreen,
    ];

    /// Wire representation, e.g. "16:9".
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::TallPortrait => "9:16",
            AspectRatio::Widescreen => "16:9",
        }
    }

    /// Parse the wire representation.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|ratio| ratio.as_str() == value)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output resolution of a generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    /// All supported sizes.
    pub const ALL: [ImageSize; 3] = [ImageSize::OneK, ImageSize::TwoK, ImageSize::FourK];

    /// Wire representation, e.g. "2K".
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }

    /// Parse the wire representation. A lowercase `k` is accepted.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|size| size.as_str() == value)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tools this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    GenerateImage,
    EditImage,
    DescribeImage,
}

impl ToolKind {
    /// All tools, in listing order.
    pub const ALL: [ToolKind; 3] = [
        ToolKind::GenerateImage,
        ToolKind::EditImage,
        ToolKind::DescribeImage,
    ];

    /// MCP tool name.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::GenerateImage => "generate_image",
            ToolKind::EditImage => "edit_image",
            ToolKind::DescribeImage => "describe_image",
        }
    }

    /// Look a tool up by its MCP name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether a successful call must produce an image.
    pub fn requires_image(self) -> bool {
        !matches!(self, ToolKind::DescribeImage)
    }
}

// =============================================================================
// Tool Parameters (as sent by the host)
// =============================================================================

/// Tool parameters for generate_image.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageToolParams {
    /// Text prompt describing the image to generate
    #[schemars(required)]
    pub prompt: Option<String>,
    /// Model to use: gemini-3-pro-image-preview (default), gemini-2.5-flash-image,
    /// or gemini-2.0-flash-preview-image-generation
    pub model: Option<String>,
    /// Aspect ratio of the output image (default: 1:1)
    #[schemars(with = "Option<AspectRatio>")]
    pub aspect_ratio: Option<String>,
    /// Output resolution (default: 1K). Only gemini-3-pro-image-preview honours 2K and 4K.
    #[schemars(with = "Option<ImageSize>")]
    pub image_size: Option<String>,
    /// Local file path to also save the generated image to
    pub output_path: Option<String>,
    /// Up to 14 reference images used as style or content anchors
    #[schemars(length(max = 14))]
    pub reference_images: Option<Vec<ImageInput>>,
}

/// Tool parameters for edit_image.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditImageToolParams {
    /// Instruction describing the edit to make
    #[schemars(required)]
    pub prompt: Option<String>,
    /// Images to edit (1 to 14), in the order the prompt refers to them
    #[schemars(required, length(min = 1, max = 14))]
    pub images: Option<Vec<ImageInput>>,
    /// Model to use (default: gemini-3-pro-image-preview)
    pub model: Option<String>,
    /// Output resolution (default: 1K)
    #[schemars(with = "Option<ImageSize>")]
    pub image_size: Option<String>,
    /// Local file path to also save the edited image to
    pub output_path: Option<String>,
}

/// Tool parameters for describe_image.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DescribeImageToolParams {
    /// Images to describe (at least one)
    #[schemars(required, length(min = 1))]
    pub images: Option<Vec<ImageInput>>,
    /// Question or instruction about the images (default: "Describe this image in detail.")
    pub prompt: Option<String>,
    /// Model to use (default: gemini-3-pro-image-preview)
    pub model: Option<String>,
}

// =============================================================================
// Validated Requests
// =============================================================================

/// A validated generate_image request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateImageRequest {
    pub prompt: String,
    pub model: &'static GeminiImageModel,
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
    pub output_path: Option<PathBuf>,
    pub reference_images: Vec<MediaPart>,
}

/// A validated edit_image request.
#[derive(Debug, Clone, PartialEq)]
pub struct EditImageRequest {
    pub prompt: String,
    pub images: Vec<MediaPart>,
    pub model: &'static GeminiImageModel,
    pub image_size: ImageSize,
    pub output_path: Option<PathBuf>,
}

/// A validated describe_image request.
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeImageRequest {
    pub images: Vec<MediaPart>,
    pub prompt: String,
    pub model: &'static GeminiImageModel,
}

/// A validated tool request.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    Generate(GenerateImageRequest),
    Edit(EditImageRequest),
    Describe(DescribeImageRequest),
}

/// Validation error details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::validation(err.to_string())
    }
}

impl ToolRequest {
    /// Validate the raw arguments of a tool call.
    pub fn from_arguments(
        kind: ToolKind,
        arguments: Option<JsonObject>,
    ) -> Result<Self, ValidationError> {
        let arguments = arguments.unwrap_or_default();
        check_required_fields(kind, &arguments)?;
        let arguments = serde_json::Value::Object(arguments);
        match kind {
            ToolKind::GenerateImage => parse_params(arguments)
                .and_then(|params: GenerateImageToolParams| params.validate())
                .map(ToolRequest::Generate),
            ToolKind::EditImage => parse_params(arguments)
                .and_then(|params: EditImageToolParams| params.validate())
                .map(ToolRequest::Edit),
            ToolKind::DescribeImage => parse_params(arguments)
                .and_then(|params: DescribeImageToolParams| params.validate())
                .map(ToolRequest::Describe),
        }
    }

    /// The tool this request belongs to.
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolRequest::Generate(_) => ToolKind::GenerateImage,
            ToolRequest::Edit(_) => ToolKind::EditImage,
            ToolRequest::Describe(_) => ToolKind::DescribeImage,
        }
    }

    /// The resolved model.
    pub fn model(&self) -> &'static GeminiImageModel {
        match self {
            ToolRequest::Generate(req) => req.model,
            ToolRequest::Edit(req) => req.model,
            ToolRequest::Describe(req) => req.model,
        }
    }

    /// Where the resulting image should also be written, if anywhere.
    pub fn output_path(&self) -> Option<&Path> {
        match self {
            ToolRequest::Generate(req) => req.output_path.as_deref(),
            ToolRequest::Edit(req) => req.output_path.as_deref(),
            ToolRequest::Describe(_) => None,
        }
    }
}

/// Required-field rules applied to the raw object, so a missing `prompt` or
/// `images` is reported even when another field has the wrong type.
fn check_required_fields(kind: ToolKind, arguments: &JsonObject) -> Result<(), ValidationError> {
    if kind != ToolKind::DescribeImage {
        let blank = match arguments.get("prompt") {
            None | Some(serde_json::Value::Null) => true,
            Some(serde_json::Value::String(prompt)) => prompt.trim().is_empty(),
            Some(_) => false,
        };
        if blank {
            return Err(ValidationError::new("prompt", "prompt is required"));
        }
    }
    if kind != ToolKind::GenerateImage {
        let empty = match arguments.get("images") {
            None | Some(serde_json::Value::Null) => true,
            Some(serde_json::Value::Array(images)) => images.is_empty(),
            Some(_) => false,
        };
        if empty {
            return Err(ValidationError::new(
                "images",
                "images required: provide at least one image",
            ));
        }
    }
    Ok(())
}

fn parse_params<T: serde::de::DeserializeOwned>(
    arguments: serde_json::Value,
) -> Result<T, ValidationError> {
    serde_json::from_value(arguments)
        .map_err(|e| ValidationError::new("arguments", format!("invalid parameters: {}", e)))
}

impl GenerateImageToolParams {
    /// Validate into a typed request.
    pub fn validate(self) -> Result<GenerateImageRequest, ValidationError> {
        let prompt = require_prompt(self.prompt)?;
        let reference_images = self.reference_images.unwrap_or_default();
        check_max_images("referenceImages", reference_images.len())?;

        let model = resolve_model(self.model.as_deref())?;
        let aspect_ratio = resolve_aspect_ratio(self.aspect_ratio.as_deref())?;
        let image_size = resolve_image_size(self.image_size.as_deref())?;
        let reference_images = to_media_parts("referenceImages", &reference_images)?;

        Ok(GenerateImageRequest {
            prompt,
            model,
            aspect_ratio,
            image_size,
            output_path: to_output_path(self.output_path),
            reference_images,
        })
    }
}

impl EditImageToolParams {
    /// Validate into a typed request.
    pub fn validate(self) -> Result<EditImageRequest, ValidationError> {
        let prompt = require_prompt(self.prompt)?;
        let images = require_images(self.images)?;
        check_max_images("images", images.len())?;

        let model = resolve_model(self.model.as_deref())?;
        let image_size = resolve_image_size(self.image_size.as_deref())?;
        let images = to_media_parts("images", &images)?;

        Ok(EditImageRequest {
            prompt,
            images,
            model,
            image_size,
            output_path: to_output_path(self.output_path),
        })
    }
}

impl DescribeImageToolParams {
    /// Validate into a typed request.
    pub fn validate(self) -> Result<DescribeImageRequest, ValidationError> {
        let images = require_images(self.images)?;

        let model = resolve_model(self.model.as_deref())?;
        let images = to_media_parts("images", &images)?;

        let prompt = self
            .prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIBE_PROMPT.to_string());

        Ok(DescribeImageRequest {
            images,
            prompt,
            model,
        })
    }
}

// =============================================================================
// Shared Rules
// =============================================================================

fn require_prompt(prompt: Option<String>) -> Result<String, ValidationError> {
    match prompt {
        Some(prompt) if !prompt.trim().is_empty() => Ok(prompt),
        _ => Err(ValidationError::new("prompt", "prompt is required")),
    }
}

fn require_images(images: Option<Vec<ImageInput>>) -> Result<Vec<ImageInput>, ValidationError> {
    match images {
        Some(images) if !images.is_empty() => Ok(images),
        _ => Err(ValidationError::new(
            "images",
            "images required: provide at least one image",
        )),
    }
}

fn check_max_images(field: &str, count: usize) -> Result<(), ValidationError> {
    if count > MAX_IMAGES {
        return Err(ValidationError::new(
            field,
            format!("at most {} images are allowed, got {}", MAX_IMAGES, count),
        ));
    }
    Ok(())
}

fn resolve_model(model: Option<&str>) -> Result<&'static GeminiImageModel, ValidationError> {
    match model.map(str::trim).filter(|name| !name.is_empty()) {
        None => Ok(ModelRegistry::default_model()),
        Some(name) => ModelRegistry::resolve(name).ok_or_else(|| {
            ValidationError::new(
                "model",
                format!(
                    "Unknown model '{}'. Valid models: {}",
                    name,
                    ModelRegistry::ids().join(", ")
                ),
            )
        }),
    }
}

fn resolve_aspect_ratio(value: Option<&str>) -> Result<AspectRatio, ValidationError> {
    let Some(value) = value else {
        return Ok(AspectRatio::default());
    };
    AspectRatio::parse(value).ok_or_else(|| {
        let valid: Vec<&str> = AspectRatio::ALL.iter().map(|r| r.as_str()).collect();
        ValidationError::new(
            "aspectRatio",
            format!("Invalid aspect ratio '{}'. Valid options: {}", value, valid.join(", ")),
        )
    })
}

fn resolve_image_size(value: Option<&str>) -> Result<ImageSize, ValidationError> {
    let Some(value) = value else {
        return Ok(ImageSize::default());
    };
    ImageSize::parse(value).ok_or_else(|| {
        let valid: Vec<&str> = ImageSize::ALL.iter().map(|s| s.as_str()).collect();
        ValidationError::new(
            "imageSize",
            format!("Invalid image size '{}'. Valid options: {}", value, valid.join(", ")),
        )
    })
}

fn to_media_parts(field: &str, images: &[ImageInput]) -> Result<Vec<MediaPart>, ValidationError> {
    images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            image
                .check()
                .map(|()| MediaPart::from(image))
                .map_err(|message| ValidationError::new(format!("{}[{}]", field, index), message))
        })
        .collect()
}

fn to_output_path(output_path: Option<String>) -> Option<PathBuf> {
    output_path
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    /// Distinct valid base64 payloads so reordering would be observable.
    fn payload_strategy() -> impl Strategy<Value = String> {
        proptest::collection::vec(any::<u8>(), 1..12).prop_map(|bytes| {
            use base64::Engine as _;
            base64::engine::general_purpose::STANDARD.encode(bytes)
        })
    }

    fn call(kind: ToolKind, value: serde_json::Value) -> Result<ToolRequest, ValidationError> {
        let serde_json::Value::Object(map) = value else {
            unreachable!("test arguments are always objects");
        };
        ToolRequest::from_arguments(kind, Some(map))
    }

    proptest! {
        /// Validation keeps reference images in caller order.
        #[test]
        fn reference_images_keep_order(payloads in proptest::collection::vec(payload_strategy(), 0..=MAX_IMAGES)) {
            let images: Vec<_> = payloads.iter().map(|p| json!({"data": p, "mimeType": "image/png"})).collect();
            let request = call(ToolKind::GenerateImage, json!({"prompt": "x", "referenceImages": images})).unwrap();
            let ToolRequest::Generate(request) = request else { unreachable!() };
            let expected: Vec<MediaPart> = payloads.iter().map(|p| MediaPart::inline(p.clone(), "image/png")).collect();
            prop_assert_eq!(request.reference_images, expected);
        }

        /// Validation keeps edit images in caller order.
        #[test]
        fn edit_images_keep_order(payloads in proptest::collection::vec(payload_strategy(), 1..=MAX_IMAGES)) {
            let images: Vec<_> = payloads.iter().map(|p| json!({"data": p, "mimeType": "image/jpeg"})).collect();
            let request = call(ToolKind::EditImage, json!({"prompt": "x", "images": images})).unwrap();
            let ToolRequest::Edit(request) = request else { unreachable!() };
            let expected: Vec<MediaPart> = payloads.iter().map(|p| MediaPart::inline(p.clone(), "image/jpeg")).collect();
            prop_assert_eq!(request.images, expected);
        }

        /// Anything above the bound is rejected, whatever the content.
        #[test]
        fn too_many_reference_images_rejected(extra in 1usize..10, data in ".*") {
            let images: Vec<_> = (0..MAX_IMAGES + extra).map(|_| json!({"data": data, "mimeType": "x"})).collect();
            let err = call(ToolKind::GenerateImage, json!({"prompt": "x", "referenceImages": images})).unwrap_err();
            prop_assert_eq!(err.field, "referenceImages");
        }
    }
}
