// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for reword-git

use thiserror::Error;

/// Errors from reading the repository or starting git
#[derive(Debug, Error)]
pub enum GitError {
    /// libgit2 failure while walking or diffing
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// No repository at or above the given path
    #[error("No git repository found at {path}")]
    RepositoryNotFound {
        /// Path the lookup started from
        path: String,
    },

    /// A revision expression that does not name a commit
    #[error("Revision does not resolve to a commit: {reference}")]
    InvalidReference {
        /// The revision as given
        reference: String,
    },

    /// History cannot be rewritten without a work tree
    #[error("Bare repository, no work tree to rebase in: {path}")]
    BareRepository {
        /// Path of the git directory
        path: String,
    },

    /// An external process could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// The program that failed to start
        program: String,
        /// The underlying IO error
        source: std::io::Error,
    },
}
