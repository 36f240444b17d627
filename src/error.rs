//! Error types for semantic-commit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::classify::ClassifiedError;

/// Errors from reading the staged diff of a repository.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Failed to open repository at {path}: {source}")]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to resolve HEAD: {0}")]
    HeadUnreadable(#[source] git2::Error),

    #[error("Failed to compute staged diff: {0}")]
    Query(#[source] git2::Error),
}

/// Errors from reading or writing settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No settings file is available for the {0} scope")]
    ScopeUnavailable(&'static str),

    #[error("Failed to read settings file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file {path} is not valid TOML: {reason}")]
    InvalidToml { path: PathBuf, reason: String },

    #[error("Failed to write settings file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the remote AI invocation.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Failed to reach the Gemini API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Gemini API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Gemini returned an unreadable response: {0}")]
    InvalidResponse(String),
}

/// Errors from depositing the generated message.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to locate the git directory of {path}: {source}")]
    GitDir {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to write commit message to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a commit-message generation aborts.
///
/// A cancelled repository selection is not represented here: the resolver
/// reports it as `Ok(None)` and the pipeline stops silently.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("No Git repository found in the workspace.")]
    NoRepositoryFound,

    #[error("Could not read the staged changes: {0}")]
    DiffRetrievalFailed(#[source] DiffError),

    #[error("No staged changes to commit.")]
    NoStagedChanges,

    #[error("The Gemini API key is not configured.")]
    MissingApiKey,

    #[error("Gemini returned an empty commit message. Please try again.")]
    EmptyGenerationResult,

    #[error("{}", .0.user_message)]
    RemoteInvocationFailed(ClassifiedError),
}
