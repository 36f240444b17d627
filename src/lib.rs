//! semantic-commit - A CLI tool that writes Conventional Commits messages for
//! staged changes using Google Gemini.
//!
//! # Overview
//!
//! semantic-commit picks a git repository, reads its staged diff, asks a
//! Gemini model for a single-line commit message through a JSON response
//! schema, strips any markdown from the answer and hands the result to a
//! sink (stdout or `.git/COMMIT_EDITMSG`).

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod sanitize;
pub mod ui;

// Re-export commonly used types
pub use commit::{GenerationContext, generate_commit_message, run_generation};
pub use config::{ConfigKey, ConfigProvider, ConfigScope, Language, ModelId, TomlConfigProvider};
pub use error::{AiError, ConfigError, DiffError, GenerationError, SinkError};
pub use git::{MessageSink, Repository};
pub use llm::{AiClient, AiRequest, ApiKey, ClassifiedError, GeminiClient};
pub use sanitize::strip_markdown;
pub use ui::{Interaction, TerminalInteraction};
