//! Settings: languages, models, keys and the provider abstraction.

pub mod file;
pub mod gateway;

use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;

pub use file::{GLOBAL_CONFIG_FILE, TomlConfigProvider, WORKSPACE_CONFIG_FILE};
pub use gateway::{
    get_api_key_or_prompt, get_language, get_model_id, set_api_key, set_language, set_model_id,
};

/// Output language of generated messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    PortugueseBrazil,
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::PortugueseBrazil, Language::English];

    /// Stored identifier.
    pub fn id(self) -> &'static str {
        match self {
            Language::PortugueseBrazil => "pt-BR",
            Language::English => "en",
        }
    }

    /// Human-readable name for pickers.
    pub fn label(self) -> &'static str {
        match self {
            Language::PortugueseBrazil => "Português (Brasil)",
            Language::English => "English",
        }
    }

    /// Parse a stored identifier, ignoring case.
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.id().eq_ignore_ascii_case(id))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Gemini model used for generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelId {
    #[default]
    Gemini25Flash,
    Gemini25Pro,
    Gemini25FlashLite,
    Gemini20Flash,
}

impl ModelId {
    pub const ALL: [ModelId; 4] = [
        ModelId::Gemini25Flash,
        ModelId::Gemini25Pro,
        ModelId::Gemini25FlashLite,
        ModelId::Gemini20Flash,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ModelId::Gemini25Flash => "gemini-2.5-flash",
            ModelId::Gemini25Pro => "gemini-2.5-pro",
            ModelId::Gemini25FlashLite => "gemini-2.5-flash-lite",
            ModelId::Gemini20Flash => "gemini-2.0-flash",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModelId::Gemini25Flash => "Gemini 2.5 Flash (default)",
            ModelId::Gemini25Pro => "Gemini 2.5 Pro",
            ModelId::Gemini25FlashLite => "Gemini 2.5 Flash-Lite",
            ModelId::Gemini20Flash => "Gemini 2.0 Flash",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|model| model.id().eq_ignore_ascii_case(id))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A stored setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ApiKey,
    Language,
    ModelId,
}

impl ConfigKey {
    /// Key name inside the settings file.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::ApiKey => "apiKey",
            ConfigKey::Language => "language",
            ConfigKey::ModelId => "modelId",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a setting is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigScope {
    /// Per-user settings file.
    #[default]
    Global,
    /// Settings file at the workspace root.
    Workspace,
}

impl ConfigScope {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigScope::Global => "global",
            ConfigScope::Workspace => "workspace",
        }
    }
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read/write access to settings.
///
/// Values are read fresh on every call. Blank values are reported as absent.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigProvider: Send + Sync {
    fn get(&self, key: ConfigKey) -> Option<String>;

    fn update(&self, key: ConfigKey, value: &str, scope: ConfigScope) -> Result<(), ConfigError>;

    /// Settings file backing `scope`, if one can exist.
    fn location(&self, scope: ConfigScope) -> Option<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_ids() {
        assert_eq!(Language::default(), Language::PortugueseBrazil);
        assert_eq!(Language::from_id("pt-br"), Some(Language::PortugueseBrazil));
        assert_eq!(Language::from_id(" EN "), Some(Language::English));
        assert_eq!(Language::from_id("fr"), None);
        assert_eq!(Language::English.to_string(), "en");
    }

    #[test]
    fn test_model_ids() {
        assert_eq!(ModelId::default().id(), "gemini-2.5-flash");
        for model in ModelId::ALL {
            assert_eq!(ModelId::from_id(model.id()), Some(model));
        }
        assert_eq!(ModelId::from_id("gpt-4"), None);
    }

    #[test]
    fn test_config_key_names() {
        assert_eq!(ConfigKey::ApiKey.as_str(), "apiKey");
        assert_eq!(ConfigKey::Language.as_str(), "language");
        assert_eq!(ConfigKey::ModelId.as_str(), "modelId");
    }
}
