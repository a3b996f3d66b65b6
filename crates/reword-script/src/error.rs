// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for reword-script

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or writing rewrite scripts
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A commit appears twice in a plan
    #[error("Duplicate commit in rewrite plan: {sha}")]
    DuplicateSha {
        /// The repeated commit SHA
        sha: String,
    },

    /// Failed to write an artifact
    #[error("Failed to write {path}: {source}")]
    Write {
        /// The file or directory being written
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },
}
