//! reword: rewrite recent git commit messages with AI
//!
//! This binary generates conventional-commit messages for a range of commits,
//! caching them in `.git-rewrite-ai/checkpoint.json` so interrupted runs
//! resume, and writes or runs the scripts that apply them.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use reword_ai::{AiError, OpenRouterClient, TextGenerator};
use reword_cli::apply::Applier;
use reword_cli::checkpoint::CheckpointStore;
use reword_cli::config::{Command, Config, ConfigError, Mode};
use reword_cli::editor::run_editor;
use reword_cli::pipeline::{ProgressEvent, RewriteError, Rewriter, RunOptions, RunOutcome};
use reword_git::commit::short_sha;
use reword_git::{GitCommandRunner, GitRepo};
use reword_script::{ArtifactLayout, RewritePlan};
use tracing::{debug, info, warn};

/// Stands in for the model when every commit is already cached
struct Offline;

impl TextGenerator for Offline {
    fn generate(&self, _prompt: &str, _max_output_tokens: u32) -> Result<String, AiError> {
        Err(AiError::MissingApiKey)
    }
}

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr; stdout carries the plan
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(RewriteError::RewriteFailed { stdout, stderr, .. }) =
                e.downcast_ref::<RewriteError>()
            {
                if !stdout.is_empty() {
                    eprintln!("{stdout}");
                }
                if !stderr.is_empty() {
                    eprintln!("{stderr}");
                }
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    if let Some(Command::Editor { file, messages_dir }) = &config.command {
        return editor_hook(config, file, messages_dir.as_deref());
    }

    config.validate()?;
    let repo = GitRepo::discover(config.repo_path())?;
    let workdir = repo.workdir()?.to_path_buf();
    let layout = ArtifactLayout::in_workdir(&workdir);
    let store = CheckpointStore::new(layout.checkpoint());

    let generator: Box<dyn TextGenerator> = match OpenRouterClient::new(config.client_config()) {
        Ok(client) => {
            debug!(model = %client.model(), "Using model");
            Box::new(client)
        }
        Err(_) => {
            let pending =
                Rewriter::new(&repo, &Offline, &store).pending(config.count, &config.base)?;
            if pending > 0 {
                return Err(ConfigError::MissingApiKey { pending }.into());
            }
            info!("No API key set; every commit is cached");
            Box::new(Offline)
        }
    };

    let runner = GitCommandRunner;
    let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("reword"));
    let applier = Applier::new(&runner, &workdir, layout.clone(), exe);

    let mut rewriter = Rewriter::new(&repo, generator.as_ref(), &store)
        .with_layout(layout)
        .with_applier(applier);
    if !config.json {
        rewriter = rewriter.with_progress(Box::new(print_progress));
    }
    rewriter = if config.yes {
        rewriter.with_confirmation(Box::new(|_: &RewritePlan, _: &str| true))
    } else {
        rewriter.with_confirmation(Box::new(confirm_on_stdin))
    };

    if config.mode == Mode::DryRun && !config.json {
        println!("DRY RUN - messages are shown but nothing is written\n");
    }

    let options = RunOptions {
        count: config.count,
        base: config.base.clone(),
        mode: config.mode,
        execute: config.execute,
        strategy: config.strategy,
    };
    let outcome = rewriter.run(&options)?;
    print_summary(config, &outcome)
}

fn editor_hook(config: &Config, file: &Path, messages_dir: Option<&Path>) -> Result<()> {
    let repo = GitRepo::discover(config.repo_path()).ok();
    let messages_dir = match messages_dir {
        Some(dir) => dir.to_path_buf(),
        None => {
            let repo = repo
                .as_ref()
                .context("Not inside a git repository and no --messages-dir given")?;
            ArtifactLayout::in_workdir(repo.workdir()?).messages_dir()
        }
    };

    let outcome = run_editor(file, &messages_dir, repo.as_ref().map(GitRepo::git_dir))?;
    debug!(?outcome, "Editor hook finished");
    Ok(())
}

fn print_progress(event: &ProgressEvent) {
    match event {
        ProgressEvent::Started { total, cached } => {
            println!("Rewriting {total} commit(s), {cached} cached\n");
        }
        ProgressEvent::Commit {
            index,
            total,
            sha,
            old_message,
            new_message,
            cached,
        } => {
            let tag = if *cached { " (cached)" } else { "" };
            println!(
                "[{}/{total}] {}{tag}:\nOld: {old_message}\nNew: {new_message}\n",
                index + 1,
                short_sha(sha)
            );
        }
        ProgressEvent::Completed { generated, cached } => {
            println!("Done: {generated} generated, {cached} from checkpoint");
        }
    }
}

fn confirm_on_stdin(plan: &RewritePlan, base_commit: &str) -> bool {
    let stdin = std::io::stdin();
    ask_confirmation(plan, base_commit, &mut stdin.lock(), &mut std::io::stderr())
        .unwrap_or_else(|e| {
            warn!(error = %e, "Cannot read confirmation, not rewriting");
            false
        })
}

/// Ask on `output` whether to rebase, reading a yes/no answer from `input`
fn ask_confirmation(
    plan: &RewritePlan,
    base_commit: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> std::io::Result<bool> {
    write!(
        output,
        "Rewrite {} commit(s) on top of {} with git rebase? Commit hashes will change. [y/N] ",
        plan.len(),
        short_sha(base_commit)
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn print_summary(config: &Config, outcome: &RunOutcome) -> Result<()> {
    if config.json {
        println!("{}", serde_json::to_string_pretty(&outcome.plan)?);
        return Ok(());
    }

    match config.mode {
        Mode::DryRun => {
            println!("\nRe-run with --mode apply to write rewrite scripts.");
        }
        Mode::Apply if outcome.applied => {
            println!("\nRewrote {} commit(s).", outcome.plan.len());
        }
        Mode::Apply => {
            if let Some(ref paths) = outcome.artifacts {
                println!("\nRewrite scripts:");
                println!("  reword todo:    {}", paths.reword_script.display());
                println!("  exec todo:      {}", paths.exec_script.display());
                println!("  replay script:  {}", paths.bash_script.display());
                println!("  filter-branch:  {}", paths.filter_branch_script.display());
                println!("  messages:       {}", paths.messages_dir.display());
            }
            println!("\nRe-run with --execute to rebase, or run one of the scripts yourself.");
        }
    }
    Ok(())
}
