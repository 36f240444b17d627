//! Structured request and reply types for commit-message generation.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::{Language, ModelId};
use crate::error::GenerationError;
use crate::llm::extract_json;

/// Inputs of one generation. The diff is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    diff_text: String,
    pub language: Language,
    pub model: ModelId,
}

impl GenerationRequest {
    /// `None` when `diff_text` is empty or whitespace.
    pub fn new(diff_text: impl Into<String>, language: Language, model: ModelId) -> Option<Self> {
        let diff_text = diff_text.into();
        if diff_text.trim().is_empty() {
            return None;
        }
        Some(Self {
            diff_text,
            language,
            model,
        })
    }

    pub fn diff_text(&self) -> &str {
        &self.diff_text
    }
}

/// The model's structured reply.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    #[serde(rename = "commitMessage", default)]
    pub commit_message: Option<String>,
}

/// Response schema sent with every request.
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "commitMessage": { "type": "STRING" }
        },
        "required": ["commitMessage"]
    })
}

/// Read the `commitMessage` out of the model's reply text.
///
/// Tries the text as JSON first, then the first JSON object inside it.
/// A missing, blank or unparseable message is [`GenerationError::EmptyGenerationResult`].
pub fn parse_generation_response(text: &str) -> Result<String, GenerationError> {
    let response = serde_json::from_str::<GenerationResponse>(text.trim())
        .ok()
        .or_else(|| {
            let json = extract_json(text)?;
            serde_json::from_str::<GenerationResponse>(&json).ok()
        });

    let Some(response) = response else {
        debug!("Unparseable generation reply: {:.200}", text);
        return Err(GenerationError::EmptyGenerationResult);
    };

    response
        .commit_message
        .filter(|m| !m.trim().is_empty())
        .ok_or(GenerationError::EmptyGenerationResult)
}
