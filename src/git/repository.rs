//! Repositories visible from a workspace directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// A git working tree, identified by its root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    root: PathBuf,
    name: String,
}

impl Repository {
    /// Wrap an already-resolved working tree root.
    pub fn new(root: PathBuf) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        Self { root, name }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text shown when choosing between repositories.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.root.display())
    }
}

/// Canonical working tree root of the repository containing `path`.
pub fn hint_from_path(path: &Path) -> Option<PathBuf> {
    let repo = git2::Repository::discover(path).ok()?;
    let workdir = repo.workdir()?;
    workdir.canonicalize().ok()
}

/// Repositories for `workspace`: the one containing it (if any), then those
/// rooted in its immediate subdirectories, by directory name. No duplicates.
pub fn discover_repositories(workspace: &Path) -> Vec<Repository> {
    let mut roots: Vec<PathBuf> = Vec::new();

    if let Some(root) = hint_from_path(workspace) {
        roots.push(root);
    }

    for child in child_repository_dirs(workspace) {
        if let Some(root) = open_root(&child)
            && !roots.contains(&root)
        {
            roots.push(root);
        }
    }

    debug!(
        "Found {} repositories under {}",
        roots.len(),
        workspace.display()
    );
    roots.into_iter().map(Repository::new).collect()
}

/// Immediate subdirectories of `workspace` that hold a `.git` entry.
fn child_repository_dirs(workspace: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(workspace) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {}: {}", workspace.display(), e);
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && path.join(".git").exists())
        .collect();
    dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    dirs
}

fn open_root(dir: &Path) -> Option<PathBuf> {
    match git2::Repository::open(dir) {
        Ok(repo) => repo.workdir().and_then(|w| w.canonicalize().ok()),
        Err(e) => {
            debug!("Skipping {}: {}", dir.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_and_name() {
        let repo = Repository::new(PathBuf::from("/work/api"));
        assert_eq!(repo.name(), "api");
        assert_eq!(repo.label(), "api (/work/api)");
    }

    #[test]
    fn test_workspace_without_repositories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("plain")).unwrap();
        // The temp dir itself may live inside a repository on some machines,
        // so only the child scan is asserted.
        let found = discover_repositories(dir.path());
        assert!(found.iter().all(|r| !r.root().ends_with("plain")));
    }

    #[test]
    fn test_workspace_is_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        git2::Repository::init(dir.path()).unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();

        let found = discover_repositories(&dir.path().join("src"));
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(found.first().map(Repository::root), Some(expected.as_path()));
    }

    #[test]
    fn test_child_repositories_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["web", "api", "docs"] {
            git2::Repository::init(dir.path().join(name)).unwrap();
        }
        std::fs::create_dir(dir.path().join("notes")).unwrap();

        let names: Vec<String> = discover_repositories(dir.path())
            .iter()
            .filter(|r| r.root().starts_with(dir.path().canonicalize().unwrap()))
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["api", "docs", "web"]);
    }

    #[test]
    fn test_hint_from_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        git2::Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            hint_from_path(&nested),
            Some(dir.path().canonicalize().unwrap())
        );
    }
}
