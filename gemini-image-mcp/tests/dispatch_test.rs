//! End-to-end tool dispatch tests against a deterministic backend.
//!
//! Run with: `cargo test --package gemini-image-mcp --test dispatch_test`

use async_trait::async_trait;
use gemini_image_mcp::gemini::{GenerateContentRequest, GenerateContentResponse};
use gemini_image_mcp::{GenerationBackend, ImageHandler, ImageServer};
use gemini_image_mcp_common::error::Error;
use rmcp::model::{CallToolResult, JsonObject, RawContent};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Records every request and answers with a canned response.
struct StubBackend {
    response: Result<Value, (u16, String)>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl StubBackend {
    fn answering(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(response),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16, message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err((status, message.to_string())),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for StubBackend {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, Error> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), serde_json::to_value(request).unwrap()));
        match &self.response {
            Ok(body) => Ok(serde_json::from_value(body.clone()).unwrap()),
            Err((status, message)) => Err(Error::api("stub://generateContent", *status, message)),
        }
    }
}

fn server(backend: &Arc<StubBackend>) -> ImageServer {
    ImageServer::with_handler(ImageHandler::with_backend(backend.clone()))
}

fn args(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn image_response(parts: Value) -> Value {
    json!({"candidates": [{"content": {"role": "model", "parts": parts}, "finishReason": "STOP"}]})
}

fn inline(data: &str) -> Value {
    json!({"inlineData": {"mimeType": "image/png", "data": data}})
}

fn texts(result: &CallToolResult) -> Vec<String> {
    result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .collect()
}

fn images(result: &CallToolResult) -> Vec<String> {
    result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Image(image) => Some(image.data.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn generate_applies_defaults() {
    let backend = StubBackend::answering(image_response(json!([inline("QUFB")])));
    let result = server(&backend)
        .dispatch("generate_image", args(json!({"prompt": "x"})))
        .await;

    assert_ne!(result.is_error, Some(true), "{:?}", texts(&result));
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    let (model, body) = &calls[0];
    assert_eq!(model, "gemini-3-pro-image-preview");
    assert_eq!(
        body["generationConfig"]["imageConfig"],
        json!({"aspectRatio": "1:1", "imageSize": "1K"})
    );
    assert_eq!(body["contents"][0]["parts"], json!([{"text": "x"}]));
}

#[tokio::test]
async fn generate_returns_image_then_status() {
    let backend = StubBackend::answering(image_response(json!([inline("QUFB")])));
    let result = server(&backend)
        .dispatch("generate_image", args(json!({"prompt": "x", "model": "nano-banana"})))
        .await;

    assert_eq!(result.content.len(), 2);
    assert!(matches!(result.content[0].raw, RawContent::Image(_)));
    let status = &texts(&result)[0];
    assert!(status.contains("gemini-2.5-flash-image"));
    assert!(status.contains("default resolution"));
}

#[tokio::test]
async fn edit_with_empty_images_never_calls_backend() {
    let backend = StubBackend::answering(image_response(json!([inline("QUFB")])));
    let result = server(&backend)
        .dispatch("edit_image", args(json!({"prompt": "make it blue", "images": []})))
        .await;

    assert_eq!(result.is_error, Some(true));
    assert!(texts(&result)[0].contains("images required"));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn too_many_reference_images_never_calls_backend() {
    let backend = StubBackend::answering(image_response(json!([inline("QUFB")])));
    let references: Vec<Value> = (0..15)
        .map(|_| json!({"data": "QUFB", "mimeType": "image/png"}))
        .collect();
    let result = server(&backend)
        .dispatch(
            "generate_image",
            args(json!({"prompt": "x", "referenceImages": references})),
        )
        .await;

    assert_eq!(result.is_error, Some(true));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn zero_candidates_is_error_with_single_text_part() {
    let backend = StubBackend::answering(json!({"candidates": []}));
    let result = server(&backend)
        .dispatch("generate_image", args(json!({"prompt": "x"})))
        .await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(result.content.len(), 1);
    assert!(texts(&result)[0].contains("no response generated"));
}

#[tokio::test]
async fn last_inline_image_wins_and_text_is_concatenated() {
    let backend = StubBackend::answering(image_response(json!([
        {"text": "Here is "},
        inline("QUFB"),
        {"text": "the result."},
        inline("QkJC")
    ])));
    let result = server(&backend)
        .dispatch("generate_image", args(json!({"prompt": "x"})))
        .await;

    assert_eq!(images(&result), vec!["QkJC".to_string()]);
    assert!(texts(&result)[0].contains("Model response: Here is the result."));
}

#[tokio::test]
async fn text_only_answer_to_generate_is_error_with_model_text() {
    let backend = StubBackend::answering(image_response(json!([{"text": "I can't draw that."}])));
    let result = server(&backend)
        .dispatch("generate_image", args(json!({"prompt": "x"})))
        .await;

    assert_eq!(result.is_error, Some(true));
    let message = &texts(&result)[0];
    assert!(message.contains("no image generated"));
    assert!(message.contains("I can't draw that."));
}

#[tokio::test]
async fn describe_returns_concatenated_text() {
    let backend = StubBackend::answering(image_response(json!([
        {"text": "A red "},
        {"text": "square."}
    ])));
    let result = server(&backend)
        .dispatch(
            "describe_image",
            args(json!({"images": [{"data": "QUFB", "mimeType": "image/png"}]})),
        )
        .await;

    assert_ne!(result.is_error, Some(true));
    assert_eq!(result.content.len(), 1);
    assert_eq!(texts(&result), vec!["A red square.".to_string()]);

    let (_, body) = &backend.calls()[0];
    assert_eq!(body["generationConfig"]["responseModalities"], json!(["TEXT"]));
}

#[tokio::test]
async fn describe_is_deterministic() {
    let backend = StubBackend::answering(image_response(json!([{"text": "A cat."}])));
    let server = server(&backend);
    let arguments = json!({"images": [{"data": "QUFB", "mimeType": "image/png"}], "prompt": "What is it?"});

    let first = server.dispatch("describe_image", args(arguments.clone())).await;
    let second = server.dispatch("describe_image", args(arguments)).await;

    assert_eq!(texts(&first), texts(&second));
    assert_eq!(backend.calls().len(), 2);
    assert_eq!(backend.calls()[0], backend.calls()[1]);
}

#[tokio::test]
async fn output_path_writes_decoded_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("cat.png");

    let backend = StubBackend::answering(image_response(json!([inline("QUFB")])));
    let result = server(&backend)
        .dispatch(
            "generate_image",
            args(json!({"prompt": "x", "outputPath": path.to_string_lossy()})),
        )
        .await;

    assert_ne!(result.is_error, Some(true));
    assert_eq!(std::fs::read(&path).unwrap(), b"AAA");
    assert!(texts(&result)[0].contains("Saved to:"));
}

#[tokio::test]
async fn failed_write_still_succeeds_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();
    let path = blocker.join("cat.png");

    let backend = StubBackend::answering(image_response(json!([inline("QUFB")])));
    let result = server(&backend)
        .dispatch(
            "generate_image",
            args(json!({"prompt": "x", "outputPath": path.to_string_lossy()})),
        )
        .await;

    assert_ne!(result.is_error, Some(true));
    assert_eq!(images(&result).len(), 1);
    assert!(texts(&result)[0].contains("Warning: could not save image"));
}

#[tokio::test]
async fn upstream_failure_is_error_result() {
    let backend = StubBackend::failing(403, "API key not valid");
    let result = server(&backend)
        .dispatch("generate_image", args(json!({"prompt": "x"})))
        .await;

    assert_eq!(result.is_error, Some(true));
    let message = &texts(&result)[0];
    assert!(message.contains("403"));
    assert!(message.contains("API key not valid"));
}

#[tokio::test]
async fn unknown_tool_is_error_result() {
    let backend = StubBackend::answering(json!({}));
    let result = server(&backend).dispatch("imagine", None).await;

    assert_eq!(result.is_error, Some(true));
    assert!(texts(&result)[0].contains("Unknown tool: imagine"));
    assert!(backend.calls().is_empty());
}
