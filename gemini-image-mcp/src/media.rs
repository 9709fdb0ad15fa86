//! Media parts exchanged between the host and the upstream model.
//!
//! Image bytes stay base64-encoded while in flight; the Gemini API takes and
//! returns base64, so decoding only happens when an image is written to disk.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An image supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    /// Base64-encoded image bytes. A `data:<mime>;base64,` prefix is accepted.
    pub data: String,
    /// MIME type of the image, e.g. "image/png" or "image/jpeg"
    pub mime_type: String,
}

impl ImageInput {
    /// The base64 payload with any data-URI prefix removed.
    pub fn payload(&self) -> &str {
        let data = self.data.trim();
        match data.split_once(";base64,") {
            Some((prefix, payload)) if prefix.starts_with("data:") => payload,
            _ => data,
        }
    }

    /// Check the MIME type and that the payload is decodable base64.
    pub fn check(&self) -> Result<(), String> {
        let mime_type = self.mime_type.trim();
        if !mime_type.starts_with("image/") || mime_type.len() == "image/".len() {
            return Err(format!("'{}' is not an image MIME type", self.mime_type));
        }
        let payload = self.payload();
        if payload.is_empty() {
            return Err("image data is empty".to_string());
        }
        BASE64
            .decode(payload)
            .map(|_| ())
            .map_err(|e| format!("image data is not valid base64: {}", e))
    }
}

/// One unit of content sent to the model: inline media or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPart {
    /// Base64-encoded bytes with their MIME type
    Inline { data: String, mime_type: String },
    /// Plain text
    Text(String),
}

impl MediaPart {
    /// Create an inline media part.
    pub fn inline(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        MediaPart::Inline {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        MediaPart::Text(text.into())
    }
}

impl From<&ImageInput> for MediaPart {
    fn from(input: &ImageInput) -> Self {
        MediaPart::inline(input.payload(), input.mime_type.trim())
    }
}

/// An image produced by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Base64-encoded image data
    pub data: String,
    /// MIME type of the image
    pub mime_type: String,
}

impl GeneratedImage {
    /// Decode the image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }

    /// Size of the decoded image in bytes, estimated from the base64 length.
    pub fn approx_size(&self) -> usize {
        self.data.len() / 4 * 3
    }
}
