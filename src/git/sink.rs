//! Where a generated message ends up.

use std::fs;

use tracing::info;

use crate::error::SinkError;

use super::repository::Repository;

/// Receives the final commit message for a repository.
pub trait MessageSink: Send + Sync {
    fn deposit(&self, repo: &Repository, message: &str) -> Result<(), SinkError>;
}

/// Prints the message on stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn deposit(&self, _repo: &Repository, message: &str) -> Result<(), SinkError> {
        println!("{}", message);
        Ok(())
    }
}

/// Writes the message into `.git/COMMIT_EDITMSG` so the next `git commit`
/// offers it in the editor.
#[derive(Debug, Default)]
pub struct CommitEditMsgSink;

impl MessageSink for CommitEditMsgSink {
    fn deposit(&self, repo: &Repository, message: &str) -> Result<(), SinkError> {
        let git_dir = git2::Repository::open(repo.root())
            .map(|r| r.path().to_path_buf())
            .map_err(|source| SinkError::GitDir {
                path: repo.root().to_path_buf(),
                source,
            })?;

        let path = git_dir.join("COMMIT_EDITMSG");
        fs::write(&path, format!("{}\n", message)).map_err(|source| SinkError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        info!("Wrote commit message to {}", path.display());
        Ok(())
    }
}
