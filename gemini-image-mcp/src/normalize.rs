//! Reduction of a `generateContent` response to one image and/or text.
//!
//! Only the first candidate is examined. Within it, text parts are
//! concatenated in order and the last inline image wins.

use gemini_image_mcp_common::error::Error;

use crate::gemini::{GenerateContentResponse, Part};
use crate::media::GeneratedImage;

/// What the model produced for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// The last inline image in the first candidate, if any
    pub image: Option<GeneratedImage>,
    /// All text parts of the first candidate, concatenated
    pub text: String,
}

impl GenerationOutcome {
    /// The image, or a generation error carrying whatever the model said instead.
    pub fn into_image(self) -> Result<(GeneratedImage, String), Error> {
        match self.image {
            Some(image) => Ok((image, self.text)),
            None => Err(Error::generation_with_detail("no image generated", &self.text)),
        }
    }

    /// The description text, which must not be blank.
    pub fn into_description(self) -> Result<String, Error> {
        if self.text.trim().is_empty() {
            return Err(Error::generation("no description generated"));
        }
        Ok(self.text)
    }
}

/// Reduce a response to a [`GenerationOutcome`].
///
/// Fails with a generation error when there is no candidate or the first
/// candidate carries no parts. Block and finish reasons are appended to the
/// message when the response states them.
pub fn normalize_response(response: &GenerateContentResponse) -> Result<GenerationOutcome, Error> {
    let Some(candidate) = response.candidates.first() else {
        let reason = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
            .map(|reason| format!("prompt blocked ({})", reason))
            .unwrap_or_default();
        return Err(Error::generation_with_detail("no response generated", reason));
    };

    let parts = match &candidate.content {
        Some(content) if !content.parts.is_empty() => &content.parts,
        _ => {
            let reason = candidate
                .finish_reason
                .as_deref()
                .map(|reason| format!("finish reason {}", reason))
                .unwrap_or_default();
            return Err(Error::generation_with_detail("no content in response", reason));
        }
    };

    let mut outcome = GenerationOutcome::default();
    for part in parts {
        match part {
            Part::InlineData { inline_data } => {
                outcome.image = Some(GeneratedImage {
                    data: inline_data.data.clone(),
                    mime_type: inline_data.mime_type.clone(),
                });
            }
            Part::Text { text } => outcome.text.push_str(text),
            Part::Other(_) => {}
        }
    }

    Ok(outcome)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::gemini::{Candidate, Content, InlineData};
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum PartShape {
        Image(String),
        Text(String),
    }

    fn part_strategy() -> impl Strategy<Value = PartShape> {
        prop_oneof![
            "[A-Za-z0-9]{4,16}".prop_map(PartShape::Image),
            "[a-z ]{0,12}".prop_map(PartShape::Text),
        ]
    }

    fn build(parts: &[PartShape]) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: parts
                        .iter()
                        .map(|shape| match shape {
                            PartShape::Image(data) => Part::InlineData {
                                inline_data: InlineData {
                                    mime_type: "image/png".to_string(),
                                    data: data.clone(),
                                },
                            },
                            PartShape::Text(text) => Part::Text { text: text.clone() },
                        })
                        .collect(),
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
        }
    }

    proptest! {
        /// The chosen image is always the last inline part; text keeps its order.
        #[test]
        fn last_inline_image_wins(parts in proptest::collection::vec(part_strategy(), 1..10)) {
            let outcome = normalize_response(&build(&parts)).unwrap();

            let expected_image = parts.iter().rev().find_map(|p| match p {
                PartShape::Image(data) => Some(data.clone()),
                PartShape::Text(_) => None,
            });
            let expected_text: String = parts.iter().filter_map(|p| match p {
                PartShape::Text(text) => Some(text.as_str()),
                PartShape::Image(_) => None,
            }).collect();

            prop_assert_eq!(outcome.image.map(|image| image.data), expected_image);
            prop_assert_eq!(outcome.text, expected_text);
        }

        /// Normalizing the same response twice gives the same outcome.
        #[test]
        fn normalization_is_deterministic(parts in proptest::collection::vec(part_strategy(), 1..10)) {
            let response = build(&parts);
            prop_assert_eq!(normalize_response(&response).unwrap(), normalize_response(&response).unwrap());
        }
    }
}
