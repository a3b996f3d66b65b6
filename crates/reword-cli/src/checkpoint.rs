// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Resumable progress
//!
//! The checkpoint maps commit SHA to generated message in processing order
//! and is flushed after every commit, so an interrupted run resumes at the
//! first commit without a message. The file is plain JSON:
//!
//! ```json
//! {
//!   "completed_messages": { "<sha>": "<message>" },
//!   "history_summary": "<short sha> <message>\n..."
//! }
//! ```
//!
//! There is no locking; two runs sharing a checkpoint race.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors while persisting a checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Filesystem error
    #[error("Checkpoint IO error at {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Serialization error
    #[error("Checkpoint serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persisted progress of a rewrite run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// SHA → generated message, in the order commits were processed
    #[serde(default)]
    pub completed_messages: IndexMap<String, String>,
    /// Rendered history window at the last save
    #[serde(default)]
    pub history_summary: String,
}

impl Checkpoint {
    /// Cached message for `sha`
    #[must_use]
    pub fn message(&self, sha: &str) -> Option<&str> {
        self.completed_messages.get(sha).map(String::as_str)
    }

    /// Whether `sha` already has a message
    #[must_use]
    pub fn contains(&self, sha: &str) -> bool {
        self.completed_messages.contains_key(sha)
    }

    /// Record the message for `sha`
    ///
    /// A SHA that is already present keeps its original position.
    pub fn record(&mut self, sha: impl Into<String>, message: impl Into<String>) {
        self.completed_messages.insert(sha.into(), message.into());
    }

    /// The last `n` entries, oldest first
    pub fn tail(&self, n: usize) -> impl Iterator<Item = (&str, &str)> {
        let skip = self.completed_messages.len().saturating_sub(n);
        self.completed_messages
            .iter()
            .skip(skip)
            .map(|(sha, message)| (sha.as_str(), message.as_str()))
    }

    /// Number of cached messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.completed_messages.len()
    }

    /// Whether nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed_messages.is_empty()
    }
}

/// Reads and writes the checkpoint file
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Store backed by the file at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the checkpoint
    ///
    /// A missing file gives an empty checkpoint. So does an unreadable or
    /// corrupt one, after a warning.
    #[must_use]
    pub fn load(&self) -> Checkpoint {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No checkpoint, starting fresh");
                return Checkpoint::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cannot read checkpoint, starting fresh");
                return Checkpoint::default();
            }
        };

        match serde_json::from_str::<Checkpoint>(&contents) {
            Ok(checkpoint) => {
                debug!(
                    path = %self.path.display(),
                    entries = checkpoint.len(),
                    "Loaded checkpoint"
                );
                checkpoint
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt checkpoint, starting fresh");
                Checkpoint::default()
            }
        }
    }

    /// Write the checkpoint, replacing the file atomically
    ///
    /// Creates the containing directory if needed. Readers see either the
    /// old file or the new one, never a partial write.
    ///
    /// # Errors
    ///
    /// Returns `CheckpointError` if serialization or any filesystem step fails.
    pub fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|source| CheckpointError::Io {
            path: dir.clone(),
            source,
        })?;

        let json = serde_json::to_string_pretty(checkpoint)?;
        let io_err = |source| CheckpointError::Io {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}
