//! AI-generated commit messages.

pub mod generate;
pub mod message;
pub mod prompt;

pub use generate::{GenerationContext, generate_commit_message, progress_message, run_generation};
pub use message::{
    GenerationRequest, GenerationResponse, parse_generation_response, response_schema,
};
pub use prompt::{COMMIT_TYPES, MAX_DESCRIPTION_CHARS, build_commit_prompt};
