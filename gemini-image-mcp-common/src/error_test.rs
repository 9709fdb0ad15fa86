//! Unit tests for the error hierarchy.

use crate::error::{ConfigError, Error};

#[test]
fn test_api_error_includes_endpoint_and_status() {
    let err = Error::api(
        "https://generativelanguage.googleapis.com/v1beta/models/m:generateContent",
        403,
        "API key not valid",
    );
    let msg = err.to_string();
    assert!(msg.contains("generativelanguage.googleapis.com"), "Should contain endpoint");
    assert!(msg.contains("403"), "Should contain status code");
    assert!(msg.contains("API key not valid"), "Should contain message");
}

#[test]
fn test_validation_error() {
    let err = Error::validation("referenceImages: at most 14 images are allowed");
    let msg = err.to_string();
    assert!(msg.contains("Validation"), "Should mention validation");
    assert!(msg.contains("at most 14"), "Should contain message");
}

#[test]
fn test_generation_error() {
    let err = Error::generation("no response generated");
    assert_eq!(err.to_string(), "Generation error: no response generated");
}

#[test]
fn test_generation_error_with_detail() {
    let err = Error::generation_with_detail("no image generated", "  Sorry, I can only describe.  ");
    assert_eq!(
        err.to_string(),
        "Generation error: no image generated: Sorry, I can only describe."
    );
}

#[test]
fn test_generation_error_blank_detail_is_dropped() {
    let err = Error::generation_with_detail("no image generated", "   ");
    assert_eq!(err.to_string(), "Generation error: no image generated");
}

#[test]
fn test_dispatch_error() {
    let err = Error::dispatch("make_coffee");
    assert_eq!(err.to_string(), "Unknown tool: make_coffee");
}

#[test]
fn test_client_error_classification() {
    assert!(Error::validation("x").is_client_error());
    assert!(Error::dispatch("x").is_client_error());
    assert!(!Error::generation("x").is_client_error());
    assert!(!Error::api("e", 500, "x").is_client_error());
}

#[test]
fn test_config_error_includes_var_name() {
    let err = ConfigError::missing_env_var("GEMINI_API_KEY");
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[test]
fn test_error_from_config_error() {
    let err: Error = ConfigError::invalid_value("PORT", "not a number").into();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("PORT"));
}

#[test]
fn test_error_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}
