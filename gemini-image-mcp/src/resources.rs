//! MCP Resources for the Gemini image server.
//!
//! This module provides resource implementations for:
//! - `image://models` - Available Gemini image models and what each accepts
//! - `image://options` - Valid aspect ratios, sizes and limits

use crate::request::{AspectRatio, DEFAULT_DESCRIBE_PROMPT, ImageSize, MAX_IMAGES};
use gemini_image_mcp_common::models::{ImageConfigShape, ModelRegistry};
use serde::Serialize;

/// URI of the models resource.
pub const MODELS_URI: &str = "image://models";

/// URI of the options resource.
pub const OPTIONS_URI: &str = "image://options";

/// Information about an available image model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Model identifier
    pub id: &'static str,
    /// Model aliases
    pub aliases: Vec<&'static str>,
    /// Human-readable name
    pub display_name: &'static str,
    /// Which image configuration the model accepts
    pub image_config: ImageConfigShape,
    /// Whether `aspectRatio` is honoured
    pub supports_aspect_ratio: bool,
    /// Whether `imageSize` is honoured
    pub supports_image_size: bool,
    /// Whether this is the model used when none is named
    pub is_default: bool,
}

/// Valid values and limits for tool arguments.
#[derive(Debug, Clone, Serialize)]
pub struct ImageOptions {
    pub aspect_ratios: Vec<&'static str>,
    pub default_aspect_ratio: &'static str,
    pub image_sizes: Vec<&'static str>,
    pub default_image_size: &'static str,
    /// Maximum images for `referenceImages` and edit `images`
    pub max_images: usize,
    pub default_describe_prompt: &'static str,
}

/// List all available image models.
pub fn list_models() -> Vec<ModelInfo> {
    let default_id = ModelRegistry::default_model().id;
    ModelRegistry::list()
        .iter()
        .map(|m| ModelInfo {
            id: m.id,
            aliases: m.aliases.to_vec(),
            display_name: m.display_name,
            image_config: m.image_config,
            supports_aspect_ratio: m.image_config.supports_aspect_ratio(),
            supports_image_size: m.image_config.supports_image_size(),
            is_default: m.id == default_id,
        })
        .collect()
}

/// Valid argument values.
pub fn image_options() -> ImageOptions {
    ImageOptions {
        aspect_ratios: AspectRatio::ALL.iter().map(|r| r.as_str()).collect(),
        default_aspect_ratio: AspectRatio::default().as_str(),
        image_sizes: ImageSize::ALL.iter().map(|s| s.as_str()).collect(),
        default_image_size: ImageSize::default().as_str(),
        max_images: MAX_IMAGES,
        default_describe_prompt: DEFAULT_DESCRIBE_PROMPT,
    }
}

/// Get models resource as JSON string.
pub fn models_resource_json() -> String {
    serde_json::to_string_pretty(&list_models()).unwrap_or_else(|_| "[]".to_string())
}

/// Get options resource as JSON string.
pub fn options_resource_json() -> String {
    serde_json::to_string_pretty(&image_options()).unwrap_or_else(|_| "{}".to_string())
}

/// Resource body for a URI, if the URI is known.
pub fn read(uri: &str) -> Option<String> {
    match uri {
        MODELS_URI => Some(models_resource_json()),
        OPTIONS_URI => Some(options_resource_json()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_models() {
        let models = list_models();
        let ids: Vec<&str> = models.iter().map(|m| m.id).collect();
        assert!(ids.contains(&"gemini-3-pro-image-preview"));
        assert!(ids.contains(&"gemini-2.5-flash-image"));
        assert!(ids.contains(&"gemini-2.0-flash-preview-image-generation"));
    }

    #[test]
    fn test_exactly_one_default_model() {
        let defaults: Vec<_> = list_models().into_iter().filter(|m| m.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, "gemini-3-pro-image-preview");
    }

    #[test]
    fn test_capabilities_follow_shape() {
        for model in list_models() {
            assert_eq!(model.supports_image_size, model.image_config == ImageConfigShape::Full);
        }
    }

    #[test]
    fn test_models_resource_json_is_valid() {
        let json = models_resource_json();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().map(|a| a.len()), Some(3));
        assert_eq!(parsed[1]["image_config"], "aspect_ratio_only");
    }

    #[test]
    fn test_options_resource_json() {
        let parsed: serde_json::Value = serde_json::from_str(&options_resource_json()).unwrap();
        assert_eq!(parsed["aspect_ratios"].as_array().map(|a| a.len()), Some(5));
        assert_eq!(parsed["default_aspect_ratio"], "1:1");
        assert_eq!(parsed["default_image_size"], "1K");
        assert_eq!(parsed["max_images"], 14);
    }

    #[test]
    fn test_read_unknown_uri() {
        assert!(read(MODELS_URI).is_some());
        assert!(read(OPTIONS_URI).is_some());
        assert!(read("image://providers").is_none());
    }
}
