//! Staged diff extraction using git2.

use std::path::Path;

use git2::{Diff, DiffFormat, ErrorCode, Repository, Tree};
use tracing::{debug, warn};

use crate::error::{DiffError, GenerationError};
use crate::ui::{Interaction, report_generation_error};

/// Maximum bytes of unified diff text sent to the model.
pub const MAX_DIFF_LENGTH: usize = 60_000;

/// Patch text of the staged changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDiff {
    pub text: String,
    /// Lines past [`MAX_DIFF_LENGTH`] were dropped.
    pub truncated: bool,
}

/// Resolve the HEAD tree; `Ok(None)` for a repository without commits.
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, DiffError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(DiffError::HeadUnreadable(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(DiffError::HeadUnreadable)?;
    Ok(Some(tree))
}

/// Unified patch of the index against HEAD for the repository at `repo_path`.
///
/// `Ok(None)` when nothing is staged.
pub fn staged_diff(repo_path: &Path) -> Result<Option<StagedDiff>, DiffError> {
    let repo = Repository::open(repo_path).map_err(|source| DiffError::OpenRepository {
        path: repo_path.to_path_buf(),
        source,
    })?;

    let head_tree = resolve_head_tree(&repo)?;
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(DiffError::Query)?;

    if diff.deltas().len() == 0 {
        return Ok(None);
    }

    let (text, truncated) = patch_text(&diff)?;
    if text.trim().is_empty() {
        return Ok(None);
    }

    debug!(
        "Staged diff for {}: {} files, {} bytes",
        repo_path.display(),
        diff.deltas().len(),
        text.len()
    );
    Ok(Some(StagedDiff { text, truncated }))
}

/// Render `diff` as patch text, cut at [`MAX_DIFF_LENGTH`] on a line boundary.
fn patch_text(diff: &Diff<'_>) -> Result<(String, bool), DiffError> {
    let mut text = String::new();
    let mut truncated = false;

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        if truncated {
            return true;
        }

        let content = String::from_utf8_lossy(line.content());
        let origin = line.origin();
        let prefix_len = usize::from(matches!(origin, '+' | '-' | ' '));

        if text.len() + prefix_len + content.len() > MAX_DIFF_LENGTH {
            truncated = true;
            return true;
        }

        if prefix_len == 1 {
            text.push(origin);
        }
        text.push_str(&content);
        true
    })
    .map_err(DiffError::Query)?;

    if truncated {
        warn!(
            "Staged diff exceeds {} bytes; sending a truncated diff",
            MAX_DIFF_LENGTH
        );
    }

    Ok((text, truncated))
}

/// Staged diff for `repo_path`, or `None` after telling the user why not.
///
/// An empty staging area is reported as information; a failed query as an
/// error. A truncated diff is still returned, with a warning.
pub fn get_staged_diff(repo_path: &Path, ui: &dyn Interaction) -> Option<String> {
    let err = match staged_diff(repo_path) {
        Ok(Some(diff)) => {
            if diff.truncated {
                ui.warn(&format!(
                    "The staged diff is larger than {} bytes; only the first part was sent to Gemini.",
                    MAX_DIFF_LENGTH
                ));
            }
            return Some(diff.text);
        }
        Ok(None) => GenerationError::NoStagedChanges,
        Err(e) => GenerationError::DiffRetrievalFailed(e),
    };
    report_generation_error(ui, &err);
    None
}
