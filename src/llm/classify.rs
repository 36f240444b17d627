//! Mapping of AI invocation failures to user-facing messages.

use serde::Deserialize;
use tracing::debug;

use crate::error::AiError;

use super::json::extract_json;

/// Shown when a failure carries no readable message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to generate the commit message. Please try again.";

/// Google API error payload: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

impl ApiErrorEnvelope {
    /// Parse an envelope out of `text`, which may be the bare payload or
    /// contain it somewhere inside.
    pub fn find_in(text: &str) -> Option<Self> {
        if let Ok(envelope) = serde_json::from_str::<Self>(text.trim()) {
            return Some(envelope);
        }
        let json = extract_json(text)?;
        serde_json::from_str(&json).ok()
    }

    fn message(&self) -> Option<&str> {
        non_blank(self.error.message.as_deref())
    }
}

/// An AI failure with the message to show the user.
#[derive(Debug)]
pub struct ClassifiedError {
    /// Never empty.
    pub user_message: String,
    pub cause: AiError,
}

/// Classify an AI failure.
///
/// Prefers the `error.message` of an API error payload, then the failure's
/// own message, then [`GENERIC_FAILURE_MESSAGE`].
pub fn classify(err: AiError) -> ClassifiedError {
    let user_message = payload_message(&err)
        .or_else(|| raw_message(&err))
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());

    ClassifiedError {
        user_message,
        cause: err,
    }
}

fn payload_message(err: &AiError) -> Option<String> {
    let text = match err {
        AiError::Api { body, .. } => body.clone(),
        other => other.to_string(),
    };

    let envelope = ApiErrorEnvelope::find_in(&text)?;
    debug!(
        "API error payload: code={:?} status={:?}",
        envelope.error.code, envelope.error.status
    );
    envelope.message().map(str::to_string)
}

fn raw_message(err: &AiError) -> Option<String> {
    match err {
        AiError::Api { body, .. } => non_blank(Some(body.as_str())).map(str::to_string),
        AiError::InvalidResponse(reason) => {
            non_blank(Some(reason.as_str())).map(|_| err.to_string())
        }
        AiError::Transport(_) => Some(err.to_string()),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
