//! Remote model invocation: client trait, Gemini adapter, reply parsing and
//! failure classification.

pub mod classify;
pub mod client;
pub mod gemini;
pub mod json;

pub use classify::{ApiErrorEnvelope, ClassifiedError, GENERIC_FAILURE_MESSAGE, classify};
pub use client::{AiClient, AiRequest, ApiKey};
pub use gemini::{DEFAULT_BASE_URL, GeminiClient};
pub use json::extract_json;
