// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Rewrite Orchestrator
//!
//! Walks the selected commits oldest first, reuses cached messages from the
//! checkpoint, generates the rest, and turns the result into a
//! [`RewritePlan`]. Generation never fails a run; git failures always do.
//!
//! # Example
//!
//! ```no_run
//! use reword_ai::{ClientConfig, OpenRouterClient};
//! use reword_cli::checkpoint::CheckpointStore;
//! use reword_cli::pipeline::{Rewriter, RunOptions};
//! use reword_git::GitRepo;
//! use reword_script::ArtifactLayout;
//!
//! let repo = GitRepo::discover(".").expect("open repo");
//! let layout = ArtifactLayout::in_workdir(repo.workdir().expect("workdir"));
//! let store = CheckpointStore::new(layout.checkpoint());
//! let client = OpenRouterClient::new(ClientConfig::with_api_key("sk-...")).expect("client");
//!
//! let outcome = Rewriter::new(&repo, &client, &store)
//!     .run(&RunOptions::dry_run(5))
//!     .expect("rewrite");
//! for entry in &outcome.plan {
//!     println!("{} {}", entry.sha, entry.summary());
//! }
//! ```

use reword_ai::{MessageGenerator, TextGenerator};
use reword_git::{Commit, CommitSource, GitError};
use reword_script::{ArtifactLayout, ArtifactPaths, RewritePlan, ScriptError, synthesize, write_artifacts};
use thiserror::Error;
use tracing::{debug, info};

use crate::apply::Applier;
use crate::checkpoint::{CheckpointError, CheckpointStore};
use crate::config::{Mode, Strategy};
use crate::history::HistoryWindow;

// ============================================================================
// Error Types
// ============================================================================

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Errors that end a rewrite run
#[derive(Debug, Error)]
pub enum RewriteError {
    /// Git error while reading history
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Script error
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Checkpoint could not be saved
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// The range is empty
    #[error("No commits found ending at {base}")]
    NoCommits {
        /// The requested base revision
        base: String,
    },

    /// A merge commit is in the range
    #[error("Commit {sha} is a merge commit; only linear history can be rewritten")]
    NonLinearHistory {
        /// The merge commit
        sha: String,
    },

    /// The range includes the repository's root commit
    #[error("Commit {sha} is the root commit and has no parent to rebase onto; use a smaller --count")]
    RootCommit {
        /// The root commit
        sha: String,
    },

    /// `--execute` with a range that does not end at HEAD
    #[error("--execute rebases the current branch, so --base must resolve to HEAD (got {base})")]
    BaseNotHead {
        /// The requested base revision
        base: String,
    },

    /// The user declined the confirmation prompt
    #[error("Rewrite declined; no changes made")]
    Declined,

    /// `git rebase` exited non-zero
    #[error(
        "git rebase failed ({}); the repository is left mid-rebase, use `git rebase --continue` or `git rebase --abort`",
        describe_status(.status)
    )]
    RewriteFailed {
        /// Exit code, if the process exited normally
        status: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },
}

// ============================================================================
// Progress Reporting
// ============================================================================

/// Progress callback signature
pub type ProgressCallback = Box<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Confirmation callback: shown the plan and base commit, returns consent
pub type ConfirmCallback = Box<dyn Fn(&RewritePlan, &str) -> bool + Send + Sync>;

/// Progress event during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Commits were listed
    Started {
        /// Commits in the range
        total: usize,
        /// Of which already cached
        cached: usize,
    },
    /// One commit has its final message
    Commit {
        /// Zero-based position, oldest first
        index: usize,
        /// Commits in the range
        total: usize,
        /// Full commit SHA
        sha: String,
        /// Message the commit has now
        old_message: String,
        /// Message it will get
        new_message: String,
        /// Whether the message came from the checkpoint
        cached: bool,
    },
    /// Every commit has a message
    Completed {
        /// Messages generated in this run
        generated: usize,
        /// Messages reused from the checkpoint
        cached: usize,
    },
}

// ============================================================================
// Options and Outcome
// ============================================================================

/// What to rewrite and how far to go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Number of commits
    pub count: usize,
    /// Revision the range ends at
    pub base: String,
    /// Dry run or apply
    pub mode: Mode,
    /// In apply mode, also run the rebase
    pub execute: bool,
    /// Rebase strategy for `execute`
    pub strategy: Strategy,
}

impl RunOptions {
    /// Show messages for the last `count` commits of HEAD
    #[must_use]
    pub fn dry_run(count: usize) -> Self {
        Self {
            count,
            base: "HEAD".to_string(),
            mode: Mode::DryRun,
            execute: false,
            strategy: Strategy::default(),
        }
    }

    /// Also write scripts for the last `count` commits of HEAD
    #[must_use]
    pub fn apply(count: usize) -> Self {
        Self {
            mode: Mode::Apply,
            ..Self::dry_run(count)
        }
    }

    /// End the range at `base` instead of HEAD
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Run the rebase with `strategy` after writing scripts
    #[must_use]
    pub fn with_execute(mut self, strategy: Strategy) -> Self {
        self.execute = true;
        self.strategy = strategy;
        self
    }
}

/// Result of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Commit → new message, oldest first
    pub plan: RewritePlan,
    /// Messages generated in this run
    pub generated: usize,
    /// Messages reused from the checkpoint
    pub cached: usize,
    /// Parent of the oldest commit (apply mode)
    pub base_commit: Option<String>,
    /// Written scripts (apply mode)
    pub artifacts: Option<ArtifactPaths>,
    /// Whether the rebase ran and succeeded
    pub applied: bool,
}

// ============================================================================
// Rewriter
// ============================================================================

/// Drives a rewrite run
pub struct Rewriter<'a> {
    source: &'a dyn CommitSource,
    generator: &'a dyn TextGenerator,
    store: &'a CheckpointStore,
    layout: Option<ArtifactLayout>,
    applier: Option<Applier<'a>>,
    progress: Option<ProgressCallback>,
    confirm: Option<ConfirmCallback>,
}

impl<'a> Rewriter<'a> {
    /// Create a rewriter over a commit source, a model and a checkpoint
    #[must_use]
    pub fn new(
        source: &'a dyn CommitSource,
        generator: &'a dyn TextGenerator,
        store: &'a CheckpointStore,
    ) -> Self {
        Self {
            source,
            generator,
            store,
            layout: None,
            applier: None,
            progress: None,
            confirm: None,
        }
    }

    /// Where apply mode writes its scripts
    #[must_use]
    pub fn with_layout(mut self, layout: ArtifactLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// How `execute` runs the rebase
    #[must_use]
    pub fn with_applier(mut self, applier: Applier<'a>) -> Self {
        self.applier = Some(applier);
        self
    }

    /// Set a progress callback
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Set the confirmation asked before the rebase
    ///
    /// Without one, `execute` is always declined.
    #[must_use]
    pub fn with_confirmation(mut self, callback: ConfirmCallback) -> Self {
        self.confirm = Some(callback);
        self
    }

    /// Report progress event
    fn report(&self, event: ProgressEvent) {
        if let Some(ref callback) = self.progress {
            callback(&event);
        }
    }

    /// List the range oldest first, rejecting merges
    fn commits(&self, count: usize, base: &str) -> Result<Vec<Commit>, RewriteError> {
        let mut commits = self.source.list_commits(count, base)?;
        if commits.is_empty() {
            return Err(RewriteError::NoCommits {
                base: base.to_string(),
            });
        }
        commits.reverse();

        if let Some(merge) = commits.iter().find(|c| c.is_merge()) {
            return Err(RewriteError::NonLinearHistory {
                sha: merge.sha.clone(),
            });
        }
        Ok(commits)
    }

    /// How many commits in the range have no cached message
    ///
    /// # Errors
    ///
    /// Returns `RewriteError` if the range cannot be listed or is not linear.
    pub fn pending(&self, count: usize, base: &str) -> Result<usize, RewriteError> {
        let checkpoint = self.store.load();
        Ok(self
            .commits(count, base)?
            .iter()
            .filter(|c| !checkpoint.contains(&c.sha))
            .count())
    }

    /// Produce the rewrite plan for `count` commits ending at `base`
    ///
    /// The checkpoint is saved after every commit, cached or not.
    ///
    /// # Errors
    ///
    /// Returns `RewriteError` if listing commits, reading a diff or saving
    /// the checkpoint fails.
    pub fn build_plan(&self, count: usize, base: &str) -> Result<RunOutcome, RewriteError> {
        let commits = self.commits(count, base)?;
        self.plan_commits(&commits, base)
    }

    /// Plan already-listed commits, oldest first
    fn plan_commits(&self, commits: &[Commit], base: &str) -> Result<RunOutcome, RewriteError> {
        let total = commits.len();
        info!(total, base = %base, "Starting rewrite");

        let mut checkpoint = self.store.load();
        let mut history = HistoryWindow::from_checkpoint(&checkpoint);
        let cached_total = commits
            .iter()
            .filter(|c| checkpoint.contains(&c.sha))
            .count();
        self.report(ProgressEvent::Started {
            total,
            cached: cached_total,
        });

        let messages = MessageGenerator::new(self.generator);
        let mut outcome = RunOutcome::default();

        for (index, commit) in commits.iter().enumerate() {
            let (message, cached) = match checkpoint.message(&commit.sha) {
                Some(message) => {
                    debug!(sha = %commit.short_sha(), "Using cached message");
                    (message.to_string(), true)
                }
                None => {
                    let diff = self.source.diff(&commit.sha)?;
                    debug!(sha = %commit.short_sha(), diff_len = diff.len(), "Generating message");
                    (messages.generate(&diff, &history.render()), false)
                }
            };

            history.push(&commit.sha, &message);
            outcome.plan.push(commit.sha.clone(), message.clone())?;
            checkpoint.record(commit.sha.clone(), message.clone());
            checkpoint.history_summary = history.render();
            self.store.save(&checkpoint)?;

            if cached {
                outcome.cached += 1;
            } else {
                outcome.generated += 1;
            }
            self.report(ProgressEvent::Commit {
                index,
                total,
                sha: commit.sha.clone(),
                old_message: commit.message.trim_end().to_string(),
                new_message: message,
                cached,
            });
        }

        info!(
            generated = outcome.generated,
            cached = outcome.cached,
            "Messages ready"
        );
        self.report(ProgressEvent::Completed {
            generated: outcome.generated,
            cached: outcome.cached,
        });
        Ok(outcome)
    }

    /// The commit the plan is rebased onto: the parent of its oldest commit
    ///
    /// # Errors
    ///
    /// Returns `RewriteError::RootCommit` if the oldest commit has no parent,
    /// and `RewriteError::Git` if git fails for any other reason.
    pub fn base_commit(&self, plan: &RewritePlan) -> Result<String, RewriteError> {
        let Some(oldest) = plan.oldest() else {
            return Err(RewriteError::NoCommits {
                base: String::new(),
            });
        };
        self.source
            .rev_parse(&format!("{}~1", oldest.sha))
            .map_err(|e| match e {
                GitError::InvalidReference { .. } => RewriteError::RootCommit {
                    sha: oldest.sha.clone(),
                },
                other => RewriteError::Git(other),
            })
    }

    /// Run the whole pipeline
    ///
    /// In apply mode a range reaching the root commit is rejected before any
    /// message is generated. Dry run stops after the plan. Apply mode writes
    /// the scripts, and with `execute` asks for confirmation and runs the
    /// rebase through the applier, if one is set.
    ///
    /// # Errors
    ///
    /// Returns `RewriteError` on any git, checkpoint or script failure, when
    /// the range is unsuitable, or when the user declines.
    pub fn run(&self, options: &RunOptions) -> Result<RunOutcome, RewriteError> {
        let commits = self.commits(options.count, &options.base)?;
        if options.mode == Mode::Apply
            && let Some(root) = commits.first().filter(|c| c.is_root())
        {
            return Err(RewriteError::RootCommit {
                sha: root.sha.clone(),
            });
        }

        let mut outcome = self.plan_commits(&commits, &options.base)?;
        if options.mode == Mode::DryRun {
            return Ok(outcome);
        }

        let base_commit = self.base_commit(&outcome.plan)?;
        debug!(base_commit = %base_commit, "Resolved rebase base");
        outcome.base_commit = Some(base_commit.clone());

        if let Some(ref layout) = self.layout {
            let paths = write_artifacts(layout, &synthesize(&outcome.plan, &base_commit))?;
            info!(dir = %layout.root().display(), "Rewrite scripts ready");
            outcome.artifacts = Some(paths);
        }

        if !options.execute {
            return Ok(outcome);
        }

        if self.source.rev_parse(&options.base)? != self.source.rev_parse("HEAD")? {
            return Err(RewriteError::BaseNotHead {
                base: options.base.clone(),
            });
        }
        let confirmed = self
            .confirm
            .as_ref()
            .is_some_and(|confirm| confirm(&outcome.plan, &base_commit));
        if !confirmed {
            info!("Rewrite declined");
            return Err(RewriteError::Declined);
        }

        if let Some(ref applier) = self.applier {
            applier.apply(&outcome.plan, &base_commit, options.strategy)?;
            outcome.applied = true;
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_run_options_builders() {
        let options = RunOptions::apply(3)
            .with_base("main")
            .with_execute(Strategy::Reword);
        assert_eq!(options.count, 3);
        assert_eq!(options.base, "main");
        assert_eq!(options.mode, Mode::Apply);
        assert!(options.execute);
        assert_eq!(options.strategy, Strategy::Reword);

        let dry = RunOptions::dry_run(2);
        assert_eq!(dry.mode, Mode::DryRun);
        assert!(!dry.execute);
    }

    #[test]
    fn test_rewrite_failed_message() {
        let err = RewriteError::RewriteFailed {
            status: Some(1),
            stdout: String::new(),
            stderr: String::new(),
        };
        let text = err.to_string();
        assert!(text.contains("exit status 1"));
        assert!(text.contains("git rebase --abort"));

        let killed = RewriteError::RewriteFailed {
            status: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(killed.to_string().contains("signal"));
    }
}
