// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! `GIT_EDITOR` hook for the reword strategy
//!
//! git opens the editor once per `reword` directive. The commit being
//! reworded is the last `reword` line of `<git dir>/rebase-merge/done`; older
//! git versions only expose it in the comment lines of the message file.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

/// Shortest hex token accepted as a commit id
const MIN_SHA_LEN: usize = 7;

/// Editor hook errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// A file could not be read or written
    #[error("Editor hook IO error at {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

/// What the hook did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    /// The message file now holds the generated message
    Replaced {
        /// Full SHA of the message file used
        sha: String,
    },
    /// The commit being reworded has no generated message
    NoMessage {
        /// The SHA (or prefix) git reported
        sha: String,
    },
    /// Not a rebase reword; the file was left alone
    NotRewording,
}

fn is_sha_token(token: &str) -> bool {
    token.len() >= MIN_SHA_LEN && token.chars().all(|c| c.is_ascii_hexdigit())
}

/// SHA from a todo line such as `reword 1a2b3c4 subject` or `r 1a2b3c4`
fn reword_target(line: &str) -> Option<&str> {
    let mut words = line.split_whitespace();
    match words.next()? {
        "reword" | "r" => words.next().filter(|w| is_sha_token(w)),
        _ => None,
    }
}

/// The commit being reworded, from the rebase state directory
#[must_use]
pub fn sha_from_done_file(git_dir: &Path) -> Option<String> {
    let done = fs::read_to_string(git_dir.join("rebase-merge").join("done")).ok()?;
    done.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(reword_target)
        .next_back()
        .map(str::to_ascii_lowercase)
}

/// The commit being reworded, from the message template's comment lines
#[must_use]
pub fn sha_from_comments(message: &str) -> Option<String> {
    message
        .lines()
        .filter_map(|line| line.strip_prefix('#'))
        .filter_map(reword_target)
        .next_back()
        .map(str::to_ascii_lowercase)
}

/// The message file whose name starts with `sha`, if exactly one does
///
/// # Errors
///
/// Returns `EditorError::Io` if the directory exists but cannot be listed.
pub fn find_message_file(messages_dir: &Path, sha: &str) -> Result<Option<PathBuf>, EditorError> {
    let entries = match fs::read_dir(messages_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(EditorError::Io {
                path: messages_dir.to_path_buf(),
                source,
            });
        }
    };

    let mut matches: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "txt")
                && path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(|stem| stem.starts_with(sha))
        })
        .collect();

    if matches.len() > 1 {
        warn!(sha = %sha, candidates = matches.len(), "Ambiguous commit prefix, keeping original message");
        return Ok(None);
    }
    Ok(matches.pop())
}

/// Replace `message_file` with the generated message for the commit being reworded
///
/// `git_dir` is where `rebase-merge/done` is looked for; comment lines of the
/// message file are the fallback.
///
/// # Errors
///
/// Returns `EditorError::Io` if a file cannot be read or written.
pub fn run_editor(
    message_file: &Path,
    messages_dir: &Path,
    git_dir: Option<&Path>,
) -> Result<EditorOutcome, EditorError> {
    let current = fs::read_to_string(message_file).map_err(|source| EditorError::Io {
        path: message_file.to_path_buf(),
        source,
    })?;

    let Some(sha) = git_dir
        .and_then(sha_from_done_file)
        .or_else(|| sha_from_comments(&current))
    else {
        debug!(file = %message_file.display(), "Not a reword, leaving message alone");
        return Ok(EditorOutcome::NotRewording);
    };

    let Some(path) = find_message_file(messages_dir, &sha)? else {
        warn!(sha = %sha, "No generated message, keeping original");
        return Ok(EditorOutcome::NoMessage { sha });
    };

    let message = fs::read_to_string(&path).map_err(|source| EditorError::Io {
        path: path.clone(),
        source,
    })?;
    fs::write(message_file, message).map_err(|source| EditorError::Io {
        path: message_file.to_path_buf(),
        source,
    })?;

    let full_sha = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(&sha)
        .to_string();
    info!(sha = %full_sha, "Reworded commit");
    Ok(EditorOutcome::Replaced { sha: full_sha })
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use tempfile::TempDir;

    const FULL: &str = "1a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d";

    fn setup() -> (TempDir, PathBuf, PathBuf, PathBuf) {
        let dir = TempDir::new().expect("tempdir");
        let git_dir = dir.path().join(".git");
        let messages = dir.path().join("messages");
        fs::create_dir_all(git_dir.join("rebase-merge")).expect("mkdir");
        fs::create_dir_all(&messages).expect("mkdir");
        fs::write(messages.join(format!("{FULL}.txt")), "feat: generated\n").expect("write");
        let msg_file = git_dir.join("COMMIT_EDITMSG");
        fs::write(&msg_file, "old message\n").expect("write");
        (dir, git_dir, messages, msg_file)
    }

    #[test]
    fn test_reword_target() {
        assert_eq!(reword_target("reword 1a2b3c4 subject"), Some("1a2b3c4"));
        assert_eq!(reword_target("r 1a2b3c4"), Some("1a2b3c4"));
        assert_eq!(reword_target("pick 1a2b3c4 subject"), None);
        assert_eq!(reword_target("reword xyz"), None);
    }

    #[test]
    fn test_replaces_from_done_file() {
        let (_dir, git_dir, messages, msg_file) = setup();
        fs::write(
            git_dir.join("rebase-merge").join("done"),
            "pick 0000000 first\nreword 1a2b3c4 second\n",
        )
        .expect("write");

        let outcome = run_editor(&msg_file, &messages, Some(&git_dir)).expect("editor");
        assert_eq!(
            outcome,
            EditorOutcome::Replaced {
                sha: FULL.to_string()
            }
        );
        assert_eq!(
            fs::read_to_string(&msg_file).expect("read"),
            "feat: generated\n"
        );
    }

    #[test]
    fn test_last_reword_line_wins() {
        let (_dir, git_dir, _messages, _msg_file) = setup();
        fs::write(
            git_dir.join("rebase-merge").join("done"),
            "reword 0000000aaa first\nexec true\nreword 1A2B3C4 second\n",
        )
        .expect("write");
        assert_eq!(sha_from_done_file(&git_dir).as_deref(), Some("1a2b3c4"));
    }

    #[test]
    fn test_falls_back_to_comment_lines() {
        let (_dir, _git_dir, messages, msg_file) = setup();
        fs::write(
            &msg_file,
            "old message\n\n# interactive rebase in progress; onto 9999999\n# Last commands done:\n#    reword 1a2b3c4d old message\n",
        )
        .expect("write");

        let outcome = run_editor(&msg_file, &messages, None).expect("editor");
        assert!(matches!(outcome, EditorOutcome::Replaced { .. }));
    }

    #[test]
    fn test_unknown_commit_leaves_file_untouched() {
        let (_dir, git_dir, messages, msg_file) = setup();
        fs::write(
            git_dir.join("rebase-merge").join("done"),
            "reword fedcba9 other\n",
        )
        .expect("write");

        let outcome = run_editor(&msg_file, &messages, Some(&git_dir)).expect("editor");
        assert_eq!(
            outcome,
            EditorOutcome::NoMessage {
                sha: "fedcba9".to_string()
            }
        );
        assert_eq!(fs::read_to_string(&msg_file).expect("read"), "old message\n");
    }

    #[test]
    fn test_plain_commit_is_not_rewording() {
        let (dir, _git_dir, messages, msg_file) = setup();
        let outcome =
            run_editor(&msg_file, &messages, Some(&dir.path().join("no-git"))).expect("editor");
        assert_eq!(outcome, EditorOutcome::NotRewording);
        assert_eq!(fs::read_to_string(&msg_file).expect("read"), "old message\n");
    }

    #[test]
    fn test_ambiguous_prefix_is_not_used() {
        let (_dir, _git_dir, messages, _msg_file) = setup();
        fs::write(
            messages.join("1a2b3c4ffffffffffffffffffffffffffffffff.txt"),
            "other\n",
        )
        .expect("write");
        assert_eq!(
            find_message_file(&messages, "1a2b3c4").expect("find"),
            None
        );
        assert!(
            find_message_file(&messages, "1a2b3c4d")
                .expect("find")
                .is_some()
        );
    }

    #[test]
    fn test_missing_messages_dir() {
        let dir = TempDir::new().expect("tempdir");
        assert_eq!(
            find_message_file(&dir.path().join("absent"), "1a2b3c4").expect("find"),
            None
        );
    }
}
