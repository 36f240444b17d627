//! User-facing notices and interactive prompts.

use std::io::{self, IsTerminal};

use dialoguer::{Confirm, Select};
use tracing::{debug, error};

use crate::error::GenerationError;

/// The interactive surface the pipeline talks to.
///
/// Notices never fail. Prompts report a dismissed or unavailable prompt the
/// same way as a "no": `false` or `None`.
#[cfg_attr(test, mockall::automock)]
pub trait Interaction: Send + Sync {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    /// Show `message` with a single `action`; `true` if the user takes it.
    fn offer_action(&self, message: &str, action: &str) -> bool;

    /// Let the user pick one of `items`; the chosen index, or `None` when
    /// cancelled.
    fn select(&self, prompt: &str, items: &[String]) -> Option<usize>;
}

/// [`Interaction`] on stderr with `dialoguer` prompts.
///
/// Prompts are skipped (answered "no") when stdin is not a terminal.
#[derive(Debug, Default)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    pub fn new() -> Self {
        Self
    }

    fn interactive() -> bool {
        let tty = io::stdin().is_terminal() && io::stderr().is_terminal();
        if !tty {
            debug!("Not a terminal; skipping prompt");
        }
        tty
    }
}

impl Interaction for TerminalInteraction {
    fn info(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn offer_action(&self, message: &str, action: &str) -> bool {
        if !Self::interactive() {
            eprintln!("{}", message);
            return false;
        }

        Confirm::new()
            .with_prompt(format!("{} {}?", message, action))
            .default(true)
            .interact_opt()
            .ok()
            .flatten()
            .unwrap_or(false)
    }

    fn select(&self, prompt: &str, items: &[String]) -> Option<usize> {
        if items.is_empty() || !Self::interactive() {
            return None;
        }

        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()
            .ok()
            .flatten()
    }
}

/// Show the notice for an aborted generation.
///
/// A missing key is not repeated here: the settings prompt already covered
/// it. An empty staging area is informational; everything else is an error.
pub fn report_generation_error(ui: &dyn Interaction, err: &GenerationError) {
    match err {
        GenerationError::MissingApiKey => debug!("Generation aborted: {}", err),
        GenerationError::NoStagedChanges => ui.info(&err.to_string()),
        GenerationError::RemoteInvocationFailed(classified) => {
            error!("Gemini request failed: {}", classified.cause);
            ui.error(&err.to_string());
        }
        GenerationError::DiffRetrievalFailed(cause) => {
            error!("Staged diff unavailable: {}", cause);
            ui.error(&err.to_string());
        }
        _ => ui.error(&err.to_string()),
    }
}
