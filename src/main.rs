//! semantic-commit - CLI entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use semantic_commit::commit::{GenerationContext, run_generation};
use semantic_commit::config::{
    ConfigScope, Language, ModelId, TomlConfigProvider, set_api_key, set_language, set_model_id,
};
use semantic_commit::git::{
    CommitEditMsgSink, MessageSink, Repository, StdoutSink, discover_repositories, hint_from_path,
};
use semantic_commit::llm::GeminiClient;
use semantic_commit::{ConfigProvider, Interaction, TerminalInteraction};

/// Write Conventional Commits messages for staged changes using Gemini.
#[derive(Parser, Debug)]
#[command(name = "semantic-commit")]
#[command(about = "Write Conventional Commits messages for staged changes using Gemini")]
#[command(version)]
struct Cli {
    /// Workspace directory to search for repositories (defaults to the current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a commit message for the staged changes (default)
    Generate(GenerateArgs),

    /// Choose the language of generated messages
    SetLanguage {
        /// Language id (pt-BR, en); prompts when omitted
        #[arg(value_parser = parse_language)]
        language: Option<Language>,

        #[arg(long, value_enum, default_value_t = ScopeArg::Global)]
        scope: ScopeArg,
    },

    /// Choose the Gemini model
    SetModel {
        /// Model id (e.g. gemini-2.5-flash); prompts when omitted
        #[arg(value_parser = parse_model)]
        model: Option<ModelId>,

        #[arg(long, value_enum, default_value_t = ScopeArg::Global)]
        scope: ScopeArg,
    },

    /// Store the Gemini API key
    SetKey {
        key: String,

        #[arg(long, value_enum, default_value_t = ScopeArg::Global)]
        scope: ScopeArg,
    },

    /// Print the settings file locations
    ConfigPath,
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// Repository to use; any path inside it works
    #[arg(long)]
    repo: Option<PathBuf>,

    /// Write the message to .git/COMMIT_EDITMSG instead of stdout
    #[arg(long)]
    apply: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScopeArg {
    Global,
    Workspace,
}

impl From<ScopeArg> for ConfigScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Global => ConfigScope::Global,
            ScopeArg::Workspace => ConfigScope::Workspace,
        }
    }
}

fn parse_language(s: &str) -> Result<Language, String> {
    Language::from_id(s).ok_or_else(|| {
        let known: Vec<&str> = Language::ALL.iter().map(|l| l.id()).collect();
        format!("unknown language '{}' (expected one of: {})", s, known.join(", "))
    })
}

fn parse_model(s: &str) -> Result<ModelId, String> {
    ModelId::from_id(s).ok_or_else(|| {
        let known: Vec<&str> = ModelId::ALL.iter().map(|m| m.id()).collect();
        format!("unknown model '{}' (expected one of: {})", s, known.join(", "))
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let workspace = match cli.workspace {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };
    let config = TomlConfigProvider::new(&workspace);
    let ui = TerminalInteraction::new();

    match cli.command.unwrap_or(Command::Generate(GenerateArgs::default())) {
        Command::Generate(args) => generate(&workspace, args, &config, &ui).await,
        Command::SetLanguage { language, scope } => {
            let labels: Vec<String> = Language::ALL.iter().map(|l| l.label().to_string()).collect();
            let Some(language) = language.or_else(|| {
                ui.select("Output language", &labels)
                    .and_then(|i| Language::ALL.get(i).copied())
            }) else {
                return Ok(ExitCode::SUCCESS);
            };
            set_language(&config, language, scope.into())
                .context("Failed to save the language")?;
            ui.info(&format!(
                "Language set to {} ({} settings)",
                language.label(),
                ConfigScope::from(scope)
            ));
            Ok(ExitCode::SUCCESS)
        }
        Command::SetModel { model, scope } => {
            let labels: Vec<String> = ModelId::ALL.iter().map(|m| m.label().to_string()).collect();
            let Some(model) = model.or_else(|| {
                ui.select("Gemini model", &labels)
                    .and_then(|i| ModelId::ALL.get(i).copied())
            }) else {
                return Ok(ExitCode::SUCCESS);
            };
            set_model_id(&config, model, scope.into()).context("Failed to save the model")?;
            ui.info(&format!(
                "Model set to {} ({} settings)",
                model,
                ConfigScope::from(scope)
            ));
            Ok(ExitCode::SUCCESS)
        }
        Command::SetKey { key, scope } => {
            if key.trim().is_empty() {
                bail!("The API key must not be empty");
            }
            set_api_key(&config, &key, scope.into()).context("Failed to save the API key")?;
            ui.info(&format!(
                "API key saved ({} settings)",
                ConfigScope::from(scope)
            ));
            Ok(ExitCode::SUCCESS)
        }
        Command::ConfigPath => {
            for scope in [ConfigScope::Global, ConfigScope::Workspace] {
                match config.location(scope) {
                    Some(path) => println!("{}: {}", scope, path.display()),
                    None => println!("{}: (unavailable)", scope),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn generate(
    workspace: &Path,
    args: GenerateArgs,
    config: &dyn ConfigProvider,
    ui: &dyn Interaction,
) -> Result<ExitCode> {
    let mut repositories = discover_repositories(workspace);

    let hint = args.repo.as_deref().and_then(|path| {
        let root = hint_from_path(path);
        if root.is_none() {
            warn!("{} is not inside a git repository; ignoring --repo", path.display());
        }
        root
    });
    if let Some(root) = &hint
        && !repositories.iter().any(|r| r.root() == root.as_path())
    {
        debug!("Adding {} from --repo", root.display());
        repositories.insert(0, Repository::new(root.clone()));
    }

    let client = GeminiClient::new().context("Failed to set up the HTTP client")?;
    let sink: Box<dyn MessageSink> = if args.apply {
        Box::new(CommitEditMsgSink)
    } else {
        Box::new(StdoutSink)
    };

    let ctx = GenerationContext {
        repositories,
        hint,
        config,
        client: &client,
        ui,
        sink: sink.as_ref(),
    };

    match run_generation(&ctx).await {
        Some(message) => {
            if args.apply {
                ui.info(&format!(
                    "✓ {}\nSaved to COMMIT_EDITMSG; run `git commit` to review and commit.",
                    message
                ));
            }
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

/// Set up logging/tracing on stderr. `RUST_LOG` takes precedence over `-v`.
fn setup_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "semantic_commit=debug,warn",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
