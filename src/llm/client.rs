//! The AI invocation boundary.

use std::fmt;

use async_trait::async_trait;

use crate::config::ModelId;
use crate::error::AiError;

/// Gemini API key. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// One structured-generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct AiRequest {
    pub model: ModelId,
    pub prompt: String,
    /// Schema the reply text must conform to.
    pub response_schema: serde_json::Value,
}

/// Trait for invoking a generative model with a typed response contract.
///
/// This abstraction allows mocking the remote service in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Send the request and return the raw reply text (expected to be JSON
    /// matching `request.response_schema`).
    async fn generate(&self, api_key: &ApiKey, request: &AiRequest) -> Result<String, AiError>;
}
