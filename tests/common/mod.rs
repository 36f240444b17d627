//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use git2::{Repository as GitRepository, Signature};

use semantic_commit::git::MessageSink;
use semantic_commit::{
    AiClient, AiError, AiRequest, ApiKey, ConfigError, ConfigKey, ConfigProvider, ConfigScope,
    Interaction, Repository, SinkError,
};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: GitRepository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = GitRepository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    /// Create a repository in `parent/name`.
    pub fn init_at(parent: &Path, name: &str) -> GitRepository {
        GitRepository::init(parent.join(name)).expect("Failed to init git repo")
    }

    /// Canonical working tree root.
    pub fn root(&self) -> PathBuf {
        self.dir.path().canonicalize().expect("Failed to canonicalize")
    }

    /// The repository as the generation pipeline sees it.
    pub fn repository(&self) -> Repository {
        Repository::new(self.root())
    }

    pub fn write_file(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).expect("Failed to write test file");
    }

    /// Add `name` to the index.
    pub fn stage(&self, name: &str) {
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(name)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Commit the current index.
    pub fn commit(&self, message: &str) {
        let sig = Signature::now("Test User", "test@example.com").expect("Failed to create signature");
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit");
    }

    /// A repository with one committed file and a staged change to it.
    pub fn with_staged_change() -> Self {
        let test_repo = Self::new();
        test_repo.write_file("app.txt", "version one\n");
        test_repo.stage("app.txt");
        test_repo.commit("init");
        test_repo.write_file("app.txt", "version two\n");
        test_repo.stage("app.txt");
        test_repo
    }
}

/// A notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warn(String),
    Error(String),
}

/// Interaction that records notices and answers prompts from fixed values.
#[derive(Default)]
pub struct RecordingInteraction {
    pub notices: Mutex<Vec<Notice>>,
    pub offers: Mutex<Vec<(String, String)>>,
    pub selections: Mutex<Vec<Vec<String>>>,
    /// Answer to every `offer_action`.
    pub accept_offers: bool,
    /// Answer to every `select`.
    pub selection: Option<usize>,
}

impl RecordingInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selecting(index: Option<usize>) -> Self {
        Self {
            selection: index,
            ..Self::default()
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Info(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn offer_count(&self) -> usize {
        self.offers.lock().unwrap().len()
    }

    pub fn selection_count(&self) -> usize {
        self.selections.lock().unwrap().len()
    }
}

impl Interaction for RecordingInteraction {
    fn info(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice::Info(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice::Warn(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice::Error(message.to_string()));
    }

    fn offer_action(&self, message: &str, action: &str) -> bool {
        self.offers
            .lock()
            .unwrap()
            .push((message.to_string(), action.to_string()));
        self.accept_offers
    }

    fn select(&self, _prompt: &str, items: &[String]) -> Option<usize> {
        self.selections.lock().unwrap().push(items.to_vec());
        self.selection
    }
}

/// What the fake model answers.
#[derive(Clone)]
pub enum FakeReply {
    Text(String),
    Api { status: u16, body: String },
}

/// AI client that returns a canned reply and records requests.
pub struct FakeAiClient {
    reply: FakeReply,
    pub requests: Mutex<Vec<AiRequest>>,
}

impl FakeAiClient {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: FakeReply::Text(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            reply: FakeReply::Api {
                status,
                body: body.to_string(),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn generate(&self, _api_key: &ApiKey, request: &AiRequest) -> Result<String, AiError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::Api { status, body } => Err(AiError::Api {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

/// In-memory settings.
#[derive(Default)]
pub struct MemoryConfig {
    values: Mutex<HashMap<ConfigKey, String>>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(key: &str) -> Self {
        let config = Self::new();
        config.set(ConfigKey::ApiKey, key);
        config
    }

    pub fn set(&self, key: ConfigKey, value: &str) {
        self.values.lock().unwrap().insert(key, value.to_string());
    }
}

impl ConfigProvider for MemoryConfig {
    fn get(&self, key: ConfigKey) -> Option<String> {
        self.values
            .lock()
            .unwrap()
            .get(&key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    fn update(&self, key: ConfigKey, value: &str, _scope: ConfigScope) -> Result<(), ConfigError> {
        self.set(key, value);
        Ok(())
    }

    fn location(&self, _scope: ConfigScope) -> Option<PathBuf> {
        None
    }
}

/// Sink that keeps every deposited message.
#[derive(Default)]
pub struct RecordingSink {
    pub deposits: Mutex<Vec<(PathBuf, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposits(&self) -> Vec<(PathBuf, String)> {
        self.deposits.lock().unwrap().clone()
    }
}

impl MessageSink for RecordingSink {
    fn deposit(&self, repo: &Repository, message: &str) -> Result<(), SinkError> {
        self.deposits
            .lock()
            .unwrap()
            .push((repo.root().to_path_buf(), message.to_string()));
        Ok(())
    }
}
