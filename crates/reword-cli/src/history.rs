// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Rolling context of recently rewritten commits

use std::collections::VecDeque;

use reword_git::commit::short_sha;

use crate::checkpoint::Checkpoint;

/// How many recent commits the prompt sees
pub const HISTORY_LEN: usize = 3;

/// Sliding window of `"<short sha> <message>"` entries, oldest first
///
/// A commit appears at most once. Pushing one that is already present moves
/// it to the newest position, so replaying cached commits over a window
/// seeded from the checkpoint yields the same window as an uninterrupted run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryWindow {
    entries: VecDeque<(String, String)>,
}

impl HistoryWindow {
    /// Create an empty window
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the most recently cached messages
    #[must_use]
    pub fn from_checkpoint(checkpoint: &Checkpoint) -> Self {
        let mut window = Self::new();
        for (sha, message) in checkpoint.tail(HISTORY_LEN) {
            window.push(sha, message);
        }
        window
    }

    /// Append a commit as the newest entry, dropping the oldest beyond [`HISTORY_LEN`]
    pub fn push(&mut self, sha: &str, message: &str) {
        let short = short_sha(sha);
        self.entries.retain(|(existing, _)| existing != short);
        if self.entries.len() == HISTORY_LEN {
            self.entries.pop_front();
        }
        self.entries
            .push_back((short.to_string(), format!("{short} {message}")));
    }

    /// Entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, entry)| entry.as_str())
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the window is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newline-joined entries, as embedded in prompts
    #[must_use]
    pub fn render(&self) -> String {
        self.iter().collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_push_formats_short_sha() {
        let mut window = HistoryWindow::new();
        window.push("0123456789abcdef", "feat: x");
        assert_eq!(window.render(), "0123456 feat: x");
    }

    #[test]
    fn test_window_keeps_last_three_in_order() {
        let mut window = HistoryWindow::new();
        for i in 0..5 {
            window.push(&format!("sha{i}000000"), &format!("m{i}"));
        }
        let entries: Vec<&str> = window.iter().collect();
        assert_eq!(entries, vec!["sha2000 m2", "sha3000 m3", "sha4000 m4"]);
    }

    #[test]
    fn test_seeded_from_checkpoint_tail() {
        let mut checkpoint = Checkpoint::default();
        checkpoint.record("aaa1111", "feat: x");
        checkpoint.record("bbb2222", "fix: y");
        checkpoint.record("ccc3333", "chore: z");
        checkpoint.record("ddd4444", "docs: w");

        let window = HistoryWindow::from_checkpoint(&checkpoint);
        assert_eq!(window.render(), "bbb2222 fix: y\nccc3333 chore: z\nddd4444 docs: w");
    }

    #[test]
    fn test_repush_moves_commit_to_newest() {
        let mut window = HistoryWindow::new();
        window.push("aaa1111", "feat: x");
        window.push("bbb2222", "fix: y");
        window.push("aaa1111", "feat: x");
        assert_eq!(window.render(), "bbb2222 fix: y\naaa1111 feat: x");
    }

    #[test]
    fn test_replaying_seeded_commits_matches_fresh_window() {
        let mut checkpoint = Checkpoint::default();
        checkpoint.record("aaa1111", "feat: x");
        checkpoint.record("bbb2222", "fix: y");

        let mut resumed = HistoryWindow::from_checkpoint(&checkpoint);
        resumed.push("aaa1111", "feat: x");
        resumed.push("bbb2222", "fix: y");

        let mut fresh = HistoryWindow::new();
        fresh.push("aaa1111", "feat: x");
        fresh.push("bbb2222", "fix: y");

        assert_eq!(resumed.render(), fresh.render());
        assert_eq!(resumed.len(), 2);
    }

    #[test]
    fn test_empty_checkpoint_gives_empty_window() {
        let window = HistoryWindow::from_checkpoint(&Checkpoint::default());
        assert!(window.is_empty());
        assert_eq!(window.render(), "");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the window holds exactly the last min(n, 3) pushes in order
        #[test]
        fn prop_window_is_last_three(messages in proptest::collection::vec("[a-z ]{0,12}", 0..20)) {
            let mut window = HistoryWindow::new();
            for (i, message) in messages.iter().enumerate() {
                window.push(&format!("{i:07}"), message);
            }

            let start = messages.len().saturating_sub(HISTORY_LEN);
            let expected: Vec<String> = messages[start..]
                .iter()
                .enumerate()
                .map(|(offset, m)| format!("{:07} {m}", start + offset))
                .collect();
            let actual: Vec<String> = window.iter().map(str::to_string).collect();
            prop_assert_eq!(actual, expected);
        }

        /// Property: resuming after k cached commits rebuilds the same window
        #[test]
        fn prop_resume_matches_uninterrupted(n in 0usize..8, k in 0usize..8) {
            let k = k.min(n);
            let commits: Vec<(String, String)> =
                (0..n).map(|i| (format!("{i:07}"), format!("m{i}"))).collect();

            let mut fresh = HistoryWindow::new();
            for (sha, message) in &commits {
                fresh.push(sha, message);
            }

            let mut checkpoint = Checkpoint::default();
            for (sha, message) in &commits[..k] {
                checkpoint.record(sha.clone(), message.clone());
            }
            let mut resumed = HistoryWindow::from_checkpoint(&checkpoint);
            for (sha, message) in &commits {
                resumed.push(sha, message);
            }

            prop_assert_eq!(resumed.render(), fresh.render());
        }
    }
}
