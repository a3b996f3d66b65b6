// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! External process execution for history rewrites
//!
//! Rebases are driven by the `git` binary rather than `git2`, since they rely
//! on sequence-editor and editor hooks. Every process goes through
//! [`RewriteRunner`] so the rewrite step can be replaced in tests.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// A fully described process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteInvocation {
    /// Program to execute
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Extra environment variables
    pub env: Vec<(String, String)>,
    /// Working directory for the process
    pub cwd: PathBuf,
}

impl RewriteInvocation {
    /// Create an invocation of `git` in the given working directory
    #[must_use]
    pub fn git(cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: "git".to_string(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: cwd.into(),
        }
    }

    /// Append an argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set an environment variable
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Look up an environment variable set on this invocation
    #[must_use]
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl RunOutput {
    /// Whether the process exited with status zero
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs external rewrite procedures
pub trait RewriteRunner {
    /// Run the invocation to completion and capture its output
    ///
    /// A non-zero exit is not an error here; callers inspect [`RunOutput`].
    ///
    /// # Errors
    ///
    /// Returns `GitError::Spawn` if the process cannot be started.
    fn run(&self, invocation: &RewriteInvocation) -> Result<RunOutput, GitError>;
}

/// The real runner, backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCommandRunner;

impl RewriteRunner for GitCommandRunner {
    fn run(&self, invocation: &RewriteInvocation) -> Result<RunOutput, GitError> {
        debug!(
            program = %invocation.program,
            args = ?invocation.args,
            cwd = %invocation.cwd.display(),
            "Running external process"
        );

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&invocation.cwd)
            .output()
            .map_err(|source| GitError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        Ok(RunOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
