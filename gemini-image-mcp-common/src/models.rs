//! Model definitions and registry for the Gemini image models.
//!
//! Each model carries the shape of image configuration it accepts, so request
//! builders look the shape up here instead of branching on model names.

use serde::Serialize;

/// How much of the nested `imageConfig` block a model honours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageConfigShape {
    /// `imageConfig { aspectRatio, imageSize }`
    Full,
    /// `imageConfig { aspectRatio }`; the requested size is dropped
    AspectRatioOnly,
    /// No `imageConfig` block at all
    Unsupported,
}

impl ImageConfigShape {
    /// Whether the model honours an explicit aspect ratio.
    pub fn supports_aspect_ratio(self) -> bool {
        !matches!(self, ImageConfigShape::Unsupported)
    }

    /// Whether the model honours an explicit output resolution.
    pub fn supports_image_size(self) -> bool {
        matches!(self, ImageConfigShape::Full)
    }
}

/// Gemini image model definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeminiImageModel {
    /// Full model identifier
    pub id: &'static str,
    /// Model aliases for convenience
    pub aliases: &'static [&'static str],
    /// Human-readable name
    pub display_name: &'static str,
    /// Image configuration accepted by the model
    pub image_config: ImageConfigShape,
}

// =============================================================================
// Static Model Definitions
// =============================================================================

/// Gemini 3 Pro Image (preview), the highest-quality tier.
pub const GEMINI_3_PRO_IMAGE_PREVIEW: GeminiImageModel = GeminiImageModel {
    id: "gemini-3-pro-image-preview",
    aliases: &["nano-banana-pro", "gemini-3-pro-image"],
    display_name: "Gemini 3 Pro Image",
    image_config: ImageConfigShape::Full,
};

/// Gemini 2.5 Flash Image.
pub const GEMINI_2_5_FLASH_IMAGE: GeminiImageModel = GeminiImageModel {
    id: "gemini-2.5-flash-image",
    aliases: &["nano-banana", "gemini-2.5-flash-image-preview"],
    display_name: "Gemini 2.5 Flash Image",
    image_config: ImageConfigShape::AspectRatioOnly,
};

/// Gemini 2.0 Flash image generation (preview).
pub const GEMINI_2_0_FLASH_IMAGE_GENERATION: GeminiImageModel = GeminiImageModel {
    id: "gemini-2.0-flash-preview-image-generation",
    aliases: &["gemini-2.0-flash-image"],
    display_name: "Gemini 2.0 Flash Image Generation",
    image_config: ImageConfigShape::Unsupported,
};

/// All available Gemini image models, highest tier first.
pub const GEMINI_IMAGE_MODELS: &[GeminiImageModel] = &[
    GEMINI_3_PRO_IMAGE_PREVIEW,
    GEMINI_2_5_FLASH_IMAGE,
    GEMINI_2_0_FLASH_IMAGE_GENERATION,
];

/// Model used when a request names none.
pub const DEFAULT_MODEL: GeminiImageModel = GEMINI_3_PRO_IMAGE_PREVIEW;

// =============================================================================
// Model Registry
// =============================================================================

/// Model registry for resolution and listing.
pub struct ModelRegistry;

impl ModelRegistry {
    /// Resolve a model name or alias to its full definition.
    ///
    /// # Examples
    ///
    /// ```
    /// use gemini_image_mcp_common::models::ModelRegistry;
    ///
    /// let model = ModelRegistry::resolve("nano-banana").unwrap();
    /// assert_eq!(model.id, "gemini-2.5-flash-image");
    /// assert!(ModelRegistry::resolve("dall-e-3").is_none());
    /// ```
    pub fn resolve(name: &str) -> Option<&'static GeminiImageModel> {
        let name = name.trim();
        GEMINI_IMAGE_MODELS
            .iter()
            .find(|model| model.id == name || model.aliases.contains(&name))
    }

    /// The default (highest-tier) model.
    pub fn default_model() -> &'static GeminiImageModel {
        &GEMINI_IMAGE_MODELS[0]
    }

    /// List all available models.
    pub fn list() -> &'static [GeminiImageModel] {
        GEMINI_IMAGE_MODELS
    }

    /// Canonical identifiers of all models, for error messages.
    pub fn ids() -> Vec<&'static str> {
        GEMINI_IMAGE_MODELS.iter().map(|model| model.id).collect()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn model_identifier_strategy() -> impl Strategy<Value = &'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for model in GEMINI_IMAGE_MODELS {
            names.push(model.id);
            names.extend_from_slice(model.aliases);
        }
        proptest::sample::select(names)
    }

    proptest! {
        /// Resolving any identifier and then its canonical id yields the same model.
        #[test]
        fn alias_resolves_to_same_model_as_canonical_id(identifier in model_identifier_strategy()) {
            let model = ModelRegistry::resolve(identifier).unwrap();
            let canonical = ModelRegistry::resolve(model.id).unwrap();
            prop_assert_eq!(model.id, canonical.id);
            prop_assert_eq!(model.image_config, canonical.image_config);
        }
    }
}
