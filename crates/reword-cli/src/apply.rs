// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Rewrite Applier
//!
//! Runs `git rebase -i <base>` with the generated todo list installed through
//! `GIT_SEQUENCE_EDITOR`. A failed rebase is reported with its full output and
//! left exactly where git stopped; recovering is `git rebase --continue` or
//! `git rebase --abort`, run by the user.

use std::path::PathBuf;

use reword_git::{RewriteInvocation, RewriteRunner, RunOutput};
use reword_script::escape::shell_quote;
use reword_script::{ArtifactLayout, ArtifactPaths, RewritePlan, synthesize, write_artifacts};
use tracing::{error, info};

use crate::config::Strategy;
use crate::pipeline::RewriteError;

/// Applies a rewrite plan to the repository through an interactive rebase
pub struct Applier<'a> {
    runner: &'a dyn RewriteRunner,
    workdir: PathBuf,
    layout: ArtifactLayout,
    editor_program: PathBuf,
}

impl<'a> Applier<'a> {
    /// Create an applier
    ///
    /// `editor_program` is the `reword` executable, invoked as
    /// `<editor_program> editor` by the reword strategy.
    #[must_use]
    pub fn new(
        runner: &'a dyn RewriteRunner,
        workdir: impl Into<PathBuf>,
        layout: ArtifactLayout,
        editor_program: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            workdir: workdir.into(),
            layout,
            editor_program: editor_program.into(),
        }
    }

    /// The `git rebase` invocation for `strategy`, given written artifacts
    #[must_use]
    pub fn invocation(
        &self,
        base_commit: &str,
        strategy: Strategy,
        paths: &ArtifactPaths,
    ) -> RewriteInvocation {
        let todo = match strategy {
            Strategy::Reword => &paths.reword_script,
            Strategy::Exec => &paths.exec_script,
        };

        let invocation = RewriteInvocation::git(&self.workdir)
            .arg("rebase")
            .arg("-i")
            .arg(base_commit)
            .env(
                "GIT_SEQUENCE_EDITOR",
                format!("cp {}", shell_quote(&todo.display().to_string())),
            );

        match strategy {
            Strategy::Reword => invocation.env(
                "GIT_EDITOR",
                format!(
                    "{} editor --messages-dir {}",
                    shell_quote(&self.editor_program.display().to_string()),
                    shell_quote(&paths.messages_dir.display().to_string())
                ),
            ),
            Strategy::Exec => invocation,
        }
    }

    /// Rewrite the commits of `plan` on top of `base_commit`
    ///
    /// Writes the artifacts first, so the todo list on disk is always the
    /// one git ran.
    ///
    /// # Errors
    ///
    /// Returns `RewriteError::Script` if artifacts cannot be written,
    /// `RewriteError::Git` if git cannot be started, and
    /// `RewriteError::RewriteFailed` if the rebase exits non-zero.
    pub fn apply(
        &self,
        plan: &RewritePlan,
        base_commit: &str,
        strategy: Strategy,
    ) -> Result<RunOutput, RewriteError> {
        let scripts = synthesize(plan, base_commit);
        let paths = write_artifacts(&self.layout, &scripts)?;
        let invocation = self.invocation(base_commit, strategy, &paths);

        info!(
            base = %base_commit,
            commits = plan.len(),
            strategy = ?strategy,
            "Starting interactive rebase"
        );
        let output = self.runner.run(&invocation)?;

        if !output.success() {
            error!(status = ?output.status, "Rebase failed; repository left as git stopped it");
            return Err(RewriteError::RewriteFailed {
                status: output.status,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        info!("Rebase finished");
        Ok(output)
    }
}
