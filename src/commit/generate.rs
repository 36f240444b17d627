//! The generation pipeline: repository, diff, prompt, model, clean-up.

use std::path::PathBuf;

use tracing::{debug, error};

use crate::commit::message::{GenerationRequest, parse_generation_response, response_schema};
use crate::commit::prompt::build_commit_prompt;
use crate::config::{
    ConfigProvider, ModelId, get_api_key_or_prompt, get_language, get_model_id,
};
use crate::error::GenerationError;
use crate::git::{MessageSink, Repository, get_staged_diff, resolve_repository};
use crate::llm::{AiClient, AiRequest, ApiKey, classify};
use crate::sanitize::strip_markdown;
use crate::ui::{Interaction, report_generation_error};

/// Generate a single-line commit message for `diff`.
///
/// Every failure is reported through `ui` and yields `None`.
pub async fn generate_commit_message(
    diff: &str,
    config: &dyn ConfigProvider,
    client: &dyn AiClient,
    ui: &dyn Interaction,
) -> Option<String> {
    match try_generate(diff, config, client, ui).await {
        Ok(message) => Some(message),
        Err(e) => {
            report_generation_error(ui, &e);
            None
        }
    }
}

async fn try_generate(
    diff: &str,
    config: &dyn ConfigProvider,
    client: &dyn AiClient,
    ui: &dyn Interaction,
) -> Result<String, GenerationError> {
    let api_key = get_api_key_or_prompt(config, ui).ok_or(GenerationError::MissingApiKey)?;

    let request = GenerationRequest::new(diff, get_language(config), get_model_id(config))
        .ok_or(GenerationError::NoStagedChanges)?;

    let prompt = build_commit_prompt(request.diff_text(), request.language);
    debug!(
        "Commit prompt length: {} chars, language {}",
        prompt.len(),
        request.language
    );

    let ai_request = AiRequest {
        model: request.model,
        prompt,
        response_schema: response_schema(),
    };

    ui.info(&progress_message(request.model));
    let reply = client
        .generate(&ApiKey::new(api_key), &ai_request)
        .await
        .map_err(|e| GenerationError::RemoteInvocationFailed(classify(e)))?;

    let raw = parse_generation_response(&reply)?;
    let cleaned = strip_markdown(&raw);
    first_line(&cleaned).ok_or(GenerationError::EmptyGenerationResult)
}

/// Notice shown while the model works.
pub fn progress_message(model: ModelId) -> String {
    format!("Generating commit message with Gemini ({})...", model)
}

/// First non-empty line, trimmed.
fn first_line(text: &str) -> Option<String> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next()?;
    if lines.next().is_some() {
        debug!("Model returned several lines; keeping the first");
    }
    Some(first.to_string())
}

/// Everything one generation command needs.
pub struct GenerationContext<'a> {
    /// Candidates, in presentation order.
    pub repositories: Vec<Repository>,
    /// Canonical root of the repository the user pointed at, if any.
    pub hint: Option<PathBuf>,
    pub config: &'a dyn ConfigProvider,
    pub client: &'a dyn AiClient,
    pub ui: &'a dyn Interaction,
    pub sink: &'a dyn MessageSink,
}

/// Run the whole command: pick a repository, read its staged diff, generate
/// and hand the message to the sink.
///
/// Returns the deposited message, or `None` when the command stopped early.
pub async fn run_generation(ctx: &GenerationContext<'_>) -> Option<String> {
    let repo = match resolve_repository(&ctx.repositories, ctx.hint.as_deref(), ctx.ui) {
        Ok(Some(repo)) => repo,
        Ok(None) => return None,
        Err(e) => {
            report_generation_error(ctx.ui, &e);
            return None;
        }
    };
    debug!("Generating for {}", repo.root().display());

    let diff = get_staged_diff(repo.root(), ctx.ui)?;
    let message = generate_commit_message(&diff, ctx.config, ctx.client, ctx.ui).await?;

    if let Err(e) = ctx.sink.deposit(&repo, &message) {
        error!("Failed to deliver commit message: {}", e);
        ctx.ui.error(&e.to_string());
        return None;
    }

    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigKey, MockConfigProvider};
    use crate::error::AiError;
    use crate::llm::client::MockAiClient;
    use crate::ui::MockInteraction;

    const DIFF: &str = "diff --git a/a.rs b/a.rs\n+fn login() {}\n";

    fn config_with_key(key: Option<&'static str>) -> MockConfigProvider {
        let mut config = MockConfigProvider::new();
        config.expect_get().returning(move |k| match k {
            ConfigKey::ApiKey => key.map(str::to_string),
            _ => None,
        });
        config
    }

    fn ui_expecting_progress() -> MockInteraction {
        let mut ui = MockInteraction::new();
        ui.expect_info()
            .withf(|msg: &str| msg == progress_message(ModelId::Gemini25Flash))
            .times(1)
            .return_const(());
        ui
    }

    fn client_replying(reply: &'static str) -> MockAiClient {
        let mut client = MockAiClient::new();
        client
            .expect_generate()
            .times(1)
            .returning(move |_, _| Ok(reply.to_string()));
        client
    }

    #[tokio::test]
    async fn test_missing_key_prompts_once_and_skips_model() {
        let config = config_with_key(None);
        let mut client = MockAiClient::new();
        client.expect_generate().never();
        let mut ui = MockInteraction::new();
        ui.expect_offer_action().times(1).return_const(false);
        ui.expect_error().never();

        assert!(
            generate_commit_message(DIFF, &config, &client, &ui)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_success_is_sanitized() {
        let config = config_with_key(Some("AIza-test"));
        let client = client_replying(r#"{"commitMessage": "**feat(auth):** add `login` flow"}"#);
        let ui = ui_expecting_progress();

        let message = generate_commit_message(DIFF, &config, &client, &ui).await;
        assert_eq!(message.as_deref(), Some("feat(auth): add login flow"));
    }

    #[tokio::test]
    async fn test_request_carries_key_model_and_prompt() {
        let config = config_with_key(Some("AIza-test"));
        let mut client = MockAiClient::new();
        client
            .expect_generate()
            .withf(|key, request| {
                key.expose() == "AIza-test"
                    && request.model.id() == "gemini-2.5-flash"
                    && request.prompt.ends_with(DIFF)
                    && request.prompt.contains("português do Brasil")
                    && request.response_schema == response_schema()
            })
            .times(1)
            .returning(|_, _| Ok(r#"{"commitMessage": "feat: add login"}"#.to_string()));
        let ui = ui_expecting_progress();

        assert!(
            generate_commit_message(DIFF, &config, &client, &ui)
                .await
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_only_first_line_is_kept() {
        let config = config_with_key(Some("k"));
        let client = client_replying(r#"{"commitMessage": "\n- feat: add cache\n- fix: typo"}"#);
        let ui = ui_expecting_progress();

        let message = generate_commit_message(DIFF, &config, &client, &ui).await;
        assert_eq!(message.as_deref(), Some("feat: add cache"));
    }

    #[tokio::test]
    async fn test_api_failure_is_classified() {
        let config = config_with_key(Some("k"));
        let mut client = MockAiClient::new();
        client.expect_generate().times(1).returning(|_, _| {
            Err(AiError::Api {
                status: 429,
                body: r#"{"error":{"code":429,"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#
                    .to_string(),
            })
        });
        let mut ui = ui_expecting_progress();
        ui.expect_error()
            .withf(|msg: &str| msg == "quota exceeded")
            .times(1)
            .return_const(());

        assert!(
            generate_commit_message(DIFF, &config, &client, &ui)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        for reply in [r#"{"commitMessage": ""}"#, r#"{"other": 1}"#, r#"{"commitMessage": "---"}"#] {
            let config = config_with_key(Some("k"));
            let client = client_replying(reply);
            let mut ui = ui_expecting_progress();
            ui.expect_error()
                .withf(|msg: &str| msg.contains("empty commit message"))
                .times(1)
                .return_const(());

            assert!(
                generate_commit_message(DIFF, &config, &client, &ui)
                    .await
                    .is_none(),
                "reply {:?} should fail",
                reply
            );
        }
    }

    #[test]
    fn test_progress_message_names_model() {
        assert_eq!(
            progress_message(ModelId::Gemini25Pro),
            "Generating commit message with Gemini (gemini-2.5-pro)..."
        );
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("  \n a \n b"), Some("a".to_string()));
        assert_eq!(first_line(" \n\t"), None);
    }
}
