//! Commits selected for rewriting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of the abbreviated SHA used in history context and logs
pub const SHORT_SHA_LEN: usize = 7;

/// One commit of the range being reworded
///
/// The record is a snapshot: rewriting creates new commits and never
/// touches this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full object id
    pub sha: String,
    /// Message as stored in the commit object
    pub message: String,
    /// Author name
    pub author: String,
    /// Commit time
    pub timestamp: DateTime<Utc>,
    /// Parent object ids, first parent first
    pub parents: Vec<String>,
    /// Index within the selected range, 0 for the oldest
    pub position: usize,
}

impl Commit {
    /// Abbreviated id for display
    #[must_use]
    pub fn short_sha(&self) -> &str {
        short_sha(&self.sha)
    }

    /// More than one parent
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// No parent at all, so there is nothing to rebase onto
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// First line of the message
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// Abbreviate any SHA-like string to [`SHORT_SHA_LEN`] characters
#[must_use]
pub fn short_sha(sha: &str) -> &str {
    sha.char_indices()
        .nth(SHORT_SHA_LEN)
        .map_or(sha, |(end, _)| &sha[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn wip(parents: &[&str]) -> Commit {
        Commit {
            sha: "3f9c2e1a7b4d5c6e8f0a1b2c3d4e5f6a7b8c9d0e".to_string(),
            message: "wip\n\nsquash later".to_string(),
            author: "Dev".to_string(),
            timestamp: Utc::now(),
            parents: parents.iter().map(|p| (*p).to_string()).collect(),
            position: 0,
        }
    }

    #[test]
    fn test_short_sha() {
        assert_eq!(wip(&[]).short_sha(), "3f9c2e1");
        assert_eq!(short_sha("abc"), "abc");
        assert_eq!(short_sha(""), "");
    }

    #[test]
    fn test_parent_shapes() {
        let root = wip(&[]);
        assert!(root.is_root());
        assert!(!root.is_merge());

        let linear = wip(&["p1"]);
        assert!(!linear.is_root());
        assert!(!linear.is_merge());

        let merge = wip(&["p1", "p2"]);
        assert!(!merge.is_root());
        assert!(merge.is_merge());
    }

    #[test]
    fn test_subject() {
        assert_eq!(wip(&[]).subject(), "wip");

        let mut empty = wip(&[]);
        empty.message.clear();
        assert_eq!(empty.subject(), "");
    }
}
