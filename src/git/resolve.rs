//! Choosing the repository a generation targets.

use std::path::Path;

use tracing::debug;

use crate::error::GenerationError;
use crate::ui::Interaction;

use super::repository::Repository;

const SELECT_PROMPT: &str = "Select a repository";

/// Pick exactly one repository out of `repositories`.
///
/// A `hint` naming one of the candidate roots wins; a single candidate is
/// taken as is; otherwise the user chooses. `Ok(None)` means the user
/// dismissed the choice.
pub fn resolve_repository(
    repositories: &[Repository],
    hint: Option<&Path>,
    ui: &dyn Interaction,
) -> Result<Option<Repository>, GenerationError> {
    if repositories.is_empty() {
        return Err(GenerationError::NoRepositoryFound);
    }

    if let Some(hint) = hint {
        match repositories.iter().find(|r| r.root() == hint) {
            Some(repo) => return Ok(Some(repo.clone())),
            None => debug!("Hint {} matches no repository", hint.display()),
        }
    }

    if let [only] = repositories {
        return Ok(Some(only.clone()));
    }

    let labels: Vec<String> = repositories.iter().map(Repository::label).collect();
    match ui.select(SELECT_PROMPT, &labels) {
        Some(index) => Ok(repositories.get(index).cloned()),
        None => {
            debug!("Repository selection cancelled");
            Ok(None)
        }
    }
}
