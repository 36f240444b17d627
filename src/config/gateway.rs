//! Typed access to settings with defaults and remediation.

use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::ui::Interaction;

use super::{ConfigKey, ConfigProvider, ConfigScope, Language, ModelId};

const MISSING_KEY_MESSAGE: &str = "Gemini API key is not configured.";
const OPEN_SETTINGS_ACTION: &str = "Open Settings";

/// The stored API key, or `None` after offering the user one way to fix it.
///
/// The remediation prompt is shown once per call; a missing key is never
/// retried.
pub fn get_api_key_or_prompt(
    config: &dyn ConfigProvider,
    ui: &dyn Interaction,
) -> Option<String> {
    if let Some(key) = config.get(ConfigKey::ApiKey) {
        return Some(key);
    }

    debug!("No API key configured");
    if ui.offer_action(MISSING_KEY_MESSAGE, OPEN_SETTINGS_ACTION) {
        ui.info(&settings_hint(config));
    }
    None
}

fn settings_hint(config: &dyn ConfigProvider) -> String {
    let mut hint = String::from(
        "Set the key with `semantic-commit set-key <KEY>` \
         or the SEMANTIC_COMMIT_API_KEY environment variable.",
    );
    for scope in [ConfigScope::Global, ConfigScope::Workspace] {
        if let Some(path) = config.location(scope) {
            hint.push_str(&format!("\n  {} settings: {}", scope, path.display()));
        }
    }
    hint
}

/// Configured output language; unknown values fall back to the default.
pub fn get_language(config: &dyn ConfigProvider) -> Language {
    match config.get(ConfigKey::Language) {
        Some(raw) => Language::from_id(&raw).unwrap_or_else(|| {
            warn!(
                "Unknown language '{}', using {}",
                raw,
                Language::default()
            );
            Language::default()
        }),
        None => Language::default(),
    }
}

/// Configured model; unknown values fall back to the default.
pub fn get_model_id(config: &dyn ConfigProvider) -> ModelId {
    match config.get(ConfigKey::ModelId) {
        Some(raw) => ModelId::from_id(&raw).unwrap_or_else(|| {
            warn!("Unknown model '{}', using {}", raw, ModelId::default());
            ModelId::default()
        }),
        None => ModelId::default(),
    }
}

pub fn set_language(
    config: &dyn ConfigProvider,
    language: Language,
    scope: ConfigScope,
) -> Result<(), ConfigError> {
    config.update(ConfigKey::Language, language.id(), scope)
}

pub fn set_model_id(
    config: &dyn ConfigProvider,
    model: ModelId,
    scope: ConfigScope,
) -> Result<(), ConfigError> {
    config.update(ConfigKey::ModelId, model.id(), scope)
}

pub fn set_api_key(
    config: &dyn ConfigProvider,
    key: &str,
    scope: ConfigScope,
) -> Result<(), ConfigError> {
    config.update(ConfigKey::ApiKey, key.trim(), scope)
}
