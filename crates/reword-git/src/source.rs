// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The read side of the version-control collaborator
//!
//! The rewrite pipeline only needs three read operations from the repository.
//! Keeping them behind a trait lets the pipeline run against an in-memory
//! history in tests.

use crate::commit::Commit;
use crate::error::GitError;

/// Read access to commits, diffs and revisions
pub trait CommitSource {
    /// List up to `count` commits ending at `base_revision`, newest first
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the revision cannot be resolved or walked.
    fn list_commits(&self, count: usize, base_revision: &str) -> Result<Vec<Commit>, GitError>;

    /// Unified diff text of a single commit against its first parent
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit or its trees cannot be read.
    fn diff(&self, sha: &str) -> Result<String, GitError>;

    /// Resolve a revision expression to a full commit SHA
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if the revision does not name a commit.
    fn rev_parse(&self, revision: &str) -> Result<String, GitError>;
}
