//! Gemini `generateContent` wire types and HTTP client.
//!
//! The client is reached through the [`GenerationBackend`] trait so the tool
//! pipeline can be driven against a stub in tests.

use async_trait::async_trait;
use gemini_image_mcp_common::config::Config;
use gemini_image_mcp_common::error::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::media::MediaPart;

/// Upper bound for a single upstream call. 4K generations can take a while.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

// =============================================================================
// Request Types
// =============================================================================

/// Body of a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A single turn of conversation content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a content turn.
///
/// Parts the server has no use for (function calls, thought signatures and so
/// on) are kept as raw JSON so an unfamiliar response still parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
    Other(serde_json::Value),
}

/// Base64 media embedded in a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Generation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// Nested image options. Which keys are present depends on the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
}

impl From<MediaPart> for Part {
    fn from(part: MediaPart) -> Self {
        match part {
            MediaPart::Inline { data, mime_type } => Part::InlineData {
                inline_data: InlineData { mime_type, data },
            },
            MediaPart::Text(text) => Part::Text { text },
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Body returned by `generateContent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One candidate answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Why a prompt was rejected before generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

// =============================================================================
// Backend
// =============================================================================

/// Something that can answer a `generateContent` call.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send one request for `model` and return the parsed response.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, Error>;
}

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    http: reqwest::Client,
    config: Config,
}

impl GeminiClient {
    /// Create a client with a fresh connection pool.
    pub fn new(config: Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    #[instrument(level = "debug", skip(self, request))]
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, Error> {
        let endpoint = self.config.generate_content_endpoint(model);
        debug!(endpoint = %endpoint, "Calling generateContent");

        let response = self
            .http
            .post(&endpoint)
            .timeout(REQUEST_TIMEOUT)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| Error::api(&endpoint, 0, format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::api(&endpoint, status.as_u16(), format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!(status = %status, "Gemini API returned an error");
            return Err(Error::api(&endpoint, status.as_u16(), api_error_message(status, &body)));
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!(body = %truncate(&body, 1000), "Unparseable generateContent response");
            Error::api(&endpoint, status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }
}

/// The `error.message` of a Google API error body, else the raw body, else
/// the status reason phrase.
fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.trim().is_empty() => parsed.error.message,
        _ if !body.trim().is_empty() => truncate(body, 1000),
        _ => status
            .canonical_reason()
            .unwrap_or("no error details")
            .to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
