// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! reword-script: history-rewrite script generation for reword
//!
//! Turns a [`RewritePlan`] (commit SHA → new message, oldest first) into the
//! procedures that apply it to a repository:
//!
//! - an interactive-rebase todo list of `reword` directives
//! - an interactive-rebase todo list of `pick` + `exec git commit --amend`
//! - a standalone bash replay script (cherry-pick + amend)
//! - a `git filter-branch` script with a per-commit message filter
//! - one message file per commit
//!
//! Every generator is a pure function of the plan and the base commit.

#![warn(missing_docs)]

pub mod artifacts;
pub mod error;
pub mod escape;
pub mod plan;
pub mod synth;

pub use artifacts::{ArtifactLayout, ArtifactPaths, write_artifacts, write_message_files};
pub use error::ScriptError;
pub use plan::{PlanEntry, RewritePlan};
pub use synth::{MessageFile, Scripts, synthesize};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::artifacts::{ArtifactLayout, ArtifactPaths};
    pub use crate::error::ScriptError;
    pub use crate::plan::{PlanEntry, RewritePlan};
    pub use crate::synth::{Scripts, synthesize};
}
