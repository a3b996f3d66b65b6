//! Configuration for the reword CLI
//!
//! Command-line flags, environment fallbacks and validation. Logging goes to
//! stderr so stdout only carries the rewrite plan.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use reword_ai::ClientConfig;
use reword_ai::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Default number of commits to rewrite
pub const DEFAULT_COUNT: usize = 5;

/// Reword - rewrite recent git commit messages with AI
#[derive(Parser, Debug, Clone)]
#[command(name = "reword")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (defaults to rewriting)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Number of commits to rewrite, ending at --base
    #[arg(short = 'n', long, default_value_t = DEFAULT_COUNT)]
    pub count: usize,

    /// Revision the rewritten range ends at
    #[arg(short, long, default_value = "HEAD")]
    pub base: String,

    /// Show messages only, or also write rewrite scripts
    #[arg(long, value_enum, default_value_t = Mode::DryRun)]
    pub mode: Mode,

    /// In apply mode, also run the rebase
    ///
    /// Asks for confirmation first unless --yes is given.
    #[arg(long, default_value = "false")]
    pub execute: bool,

    /// Rebase strategy used by --execute
    #[arg(short, long, value_enum, default_value_t = Strategy::Exec)]
    pub strategy: Strategy,

    /// Skip the confirmation prompt
    #[arg(short, long, default_value = "false")]
    pub yes: bool,

    /// Repository path (searched upward for a .git directory)
    ///
    /// Defaults to the current working directory.
    #[arg(short, long, env = "REWORD_REPO")]
    pub repo: Option<PathBuf>,

    /// OpenRouter API key
    ///
    /// Only needed when some commit has no cached message.
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model id
    #[arg(long, env = "REWORD_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// API root of an OpenAI-compatible chat-completions service
    #[arg(long, env = "REWORD_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Print the rewrite plan as JSON instead of text
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Editor hook for the reword strategy (set as GIT_EDITOR by --execute)
    ///
    /// Replaces the commit message file with the generated message of the
    /// commit being reworded. Leaves the file alone otherwise.
    Editor {
        /// Commit message file passed by git
        file: PathBuf,

        /// Directory of `<sha>.txt` message files
        ///
        /// Defaults to `.git-rewrite-ai/messages` in the repository.
        #[arg(long)]
        messages_dir: Option<PathBuf>,
    },
}

/// What a run does after generating messages
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Show old and new messages only
    #[default]
    DryRun,
    /// Also write rewrite scripts (and rebase with --execute)
    Apply,
}

/// Interactive-rebase strategy for applying the plan
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// `reword` every commit; the editor hook supplies messages
    Reword,
    /// `pick` + `exec git commit --amend` for every commit
    #[default]
    Exec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: None,
            count: DEFAULT_COUNT,
            base: "HEAD".to_string(),
            mode: Mode::DryRun,
            execute: false,
            strategy: Strategy::Exec,
            yes: false,
            repo: None,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            json: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Repository path, using the current directory as default
    #[must_use]
    pub fn repo_path(&self) -> PathBuf {
        self.repo
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Settings for the model client
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_key: self.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `--count` is zero
    /// - the repository path is specified but doesn't exist
    /// - `--execute` is given without `--mode apply`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::InvalidCount);
        }

        if let Some(ref repo) = self.repo
            && !repo.exists()
        {
            return Err(ConfigError::RepoNotFound(repo.clone()));
        }

        if self.execute && self.mode != Mode::Apply {
            return Err(ConfigError::ExecuteRequiresApply);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `--count` was zero
    #[error("--count must be at least 1")]
    InvalidCount,

    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// `--execute` without apply mode
    #[error("--execute requires --mode apply")]
    ExecuteRequiresApply,

    /// Commits need generating but there is no key
    #[error("{pending} commit(s) need new messages but no API key is set (use --api-key or OPENROUTER_API_KEY)")]
    MissingApiKey {
        /// Commits without a cached message
        pending: usize,
    },
}
