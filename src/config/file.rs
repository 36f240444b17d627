//! Layered TOML settings files.
//!
//! Lookup order, first non-blank value wins:
//! 1. `SEMANTIC_COMMIT_API_KEY`, then `GEMINI_API_KEY` (API key only)
//! 2. `<workspace>/.semantic-commit.toml`
//! 3. `<config dir>/semantic-commit/config.toml`

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use toml_edit::DocumentMut;
use tracing::{debug, warn};

use crate::error::ConfigError;

use super::{ConfigKey, ConfigProvider, ConfigScope};

/// Settings file name at the workspace root.
pub const WORKSPACE_CONFIG_FILE: &str = ".semantic-commit.toml";

/// Settings file name inside the per-user config directory.
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

const APP_DIR: &str = "semantic-commit";

/// Environment variables consulted for the API key, in order.
const API_KEY_ENV_VARS: [&str; 2] = ["SEMANTIC_COMMIT_API_KEY", "GEMINI_API_KEY"];

/// [`ConfigProvider`] over a global and a workspace TOML file.
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    global: Option<PathBuf>,
    workspace: Option<PathBuf>,
}

impl TomlConfigProvider {
    /// Provider for the user's config directory and `workspace_root`.
    pub fn new(workspace_root: &Path) -> Self {
        let global = dirs::config_dir().map(|dir| dir.join(APP_DIR).join(GLOBAL_CONFIG_FILE));
        if global.is_none() {
            warn!("No user config directory found; global settings are unavailable");
        }
        Self::with_paths(global, Some(workspace_root.join(WORKSPACE_CONFIG_FILE)))
    }

    /// Provider over explicit file paths.
    pub fn with_paths(global: Option<PathBuf>, workspace: Option<PathBuf>) -> Self {
        Self { global, workspace }
    }

    fn path_for(&self, scope: ConfigScope) -> Option<&Path> {
        match scope {
            ConfigScope::Global => self.global.as_deref(),
            ConfigScope::Workspace => self.workspace.as_deref(),
        }
    }

    fn env_value(key: ConfigKey) -> Option<String> {
        if key != ConfigKey::ApiKey {
            return None;
        }
        API_KEY_ENV_VARS.iter().find_map(|var| {
            env::var(var)
                .ok()
                .and_then(non_blank)
                .inspect(|_| debug!("Using API key from {}", var))
        })
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get(&self, key: ConfigKey) -> Option<String> {
        if let Some(value) = Self::env_value(key) {
            return Some(value);
        }

        [ConfigScope::Workspace, ConfigScope::Global]
            .into_iter()
            .filter_map(|scope| self.path_for(scope))
            .find_map(|path| read_value(path, key))
    }

    fn update(&self, key: ConfigKey, value: &str, scope: ConfigScope) -> Result<(), ConfigError> {
        let path = self
            .path_for(scope)
            .ok_or(ConfigError::ScopeUnavailable(scope.as_str()))?;

        let mut doc = match fs::read_to_string(path) {
            Ok(content) => parse_document(path, &content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => DocumentMut::new(),
            Err(e) => {
                return Err(ConfigError::ReadFailed {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        doc[key.as_str()] = toml_edit::value(value);
        write_atomic(path, &doc.to_string())?;

        debug!("Stored {} in {}", key, path.display());
        Ok(())
    }

    fn location(&self, scope: ConfigScope) -> Option<PathBuf> {
        self.path_for(scope).map(Path::to_path_buf)
    }
}

/// Value of `key` in the file at `path`. Missing or malformed files count as
/// not having the key.
fn read_value(path: &Path, key: ConfigKey) -> Option<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
            return None;
        }
    };

    let doc = match parse_document(path, &content) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("Ignoring {}", e);
            return None;
        }
    };

    doc.get(key.as_str())
        .and_then(|item| item.as_str())
        .and_then(|s| non_blank(s.to_string()))
}

fn parse_document(path: &Path, content: &str) -> Result<DocumentMut, ConfigError> {
    content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::InvalidToml {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Replace `path` with `content` via a temp file in the same directory.
fn write_atomic(path: &Path, content: &str) -> Result<(), ConfigError> {
    let write_failed = |source: io::Error| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_failed)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(content.as_bytes()).map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
