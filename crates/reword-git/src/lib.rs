// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! reword-git: Git access for reword
//!
//! This library crate reads commit ranges and diffs from a repository using
//! `git2`, and runs the external `git` processes that rewrite history.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use reword_git::{CommitSource, GitRepo};
//!
//! let repo = GitRepo::discover(".").expect("open repo");
//! let commits = repo.list_commits(5, "HEAD").expect("list commits");
//!
//! for c in commits.iter().rev() {
//!     println!("{} - {}", c.short_sha(), c.subject());
//! }
//! ```

pub mod commit;
pub mod error;
pub mod repo;
pub mod runner;
pub mod source;

pub use commit::Commit;
pub use error::GitError;
pub use repo::GitRepo;
pub use runner::{GitCommandRunner, RewriteInvocation, RewriteRunner, RunOutput};
pub use source::CommitSource;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::Commit;
    pub use crate::error::GitError;
    pub use crate::repo::GitRepo;
    pub use crate::runner::{GitCommandRunner, RewriteInvocation, RewriteRunner, RunOutput};
    pub use crate::source::CommitSource;
}
