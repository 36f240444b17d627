//! Gemini `generateContent` adapter.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AiError;

use super::client::{AiClient, AiRequest, ApiKey};

/// Public Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default timeout for one generation request.
const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Environment variable to override the default timeout.
const TIMEOUT_ENV_VAR: &str = "SEMANTIC_COMMIT_TIMEOUT";

/// Get the configured timeout duration.
///
/// Reads from SEMANTIC_COMMIT_TIMEOUT if set, otherwise uses the default of
/// 90 seconds. Logs a warning if the value is not a positive number.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate; empty when the model
    /// produced none (e.g. the prompt was blocked).
    fn text(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            warn!("Gemini blocked the prompt: {}", reason);
        }

        let Some(candidate) = self.candidates.first() else {
            return String::new();
        };

        if let Some(reason) = candidate.finish_reason.as_deref()
            && reason != "STOP"
        {
            debug!("Gemini finished with reason {}", reason);
        }

        candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Client for the public Gemini endpoint.
    pub fn new() -> Result<Self, AiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client for a custom endpoint (proxies, tests).
    pub fn with_base_url(base_url: &str) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(get_timeout())
            .build()
            .map_err(AiError::Transport)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, request: &AiRequest) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url,
            request.model.id()
        )
    }
}

#[async_trait]
impl AiClient for GeminiClient {
    async fn generate(&self, api_key: &ApiKey, request: &AiRequest) -> Result<String, AiError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
            },
        };

        debug!(
            "Calling Gemini model {} (prompt {} chars)",
            request.model,
            request.prompt.len()
        );

        let response = self
            .http
            .post(self.endpoint(request))
            .header("x-goog-api-key", api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(AiError::Transport)?;

        let status = response.status();
        let text = response.text().await.map_err(AiError::Transport)?;

        if !status.is_success() {
            return Err(AiError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| AiError::InvalidResponse(format!("{}", e)))?;

        Ok(parsed.text())
    }
}
