// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository access
//!
//! This module reads commit ranges, revisions and per-commit patches from a
//! repository using the `git2` crate.

use crate::commit::Commit;
use crate::error::GitError;
use crate::source::CommitSource;
use chrono::{TimeZone, Utc};
use git2::{DiffFormat, DiffOptions, Repository, Sort};
use std::path::Path;
use tracing::debug;

/// A git repository wrapper for reading commits and diffs
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if the path is not a git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Get the `.git` directory path
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Get the working directory, failing for bare repositories
    ///
    /// # Errors
    ///
    /// Returns `GitError::BareRepository` when there is no working tree to rebase in.
    pub fn workdir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or_else(|| GitError::BareRepository {
            path: self.repo.path().display().to_string(),
        })
    }

    /// Resolve a reference to a commit, mapping failures to `InvalidReference`
    fn find_commit(&self, reference: &str) -> Result<git2::Commit<'_>, GitError> {
        let invalid = || GitError::InvalidReference {
            reference: reference.to_string(),
        };
        self.repo
            .revparse_single(reference)
            .map_err(|_| invalid())?
            .peel_to_commit()
            .map_err(|_| invalid())
    }

    /// Extract commit metadata from a git2 commit
    fn extract_commit(git_commit: &git2::Commit<'_>, position: usize) -> Commit {
        let timestamp = Utc
            .timestamp_opt(git_commit.time().seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now);

        Commit {
            sha: git_commit.id().to_string(),
            message: git_commit.message().unwrap_or("").to_string(),
            author: git_commit.author().name().unwrap_or("Unknown").to_string(),
            timestamp,
            parents: git_commit.parent_ids().map(|id| id.to_string()).collect(),
            position,
        }
    }

    /// Render a commit the way `git show` does: header, indented message, patch
    fn render_patch(&self, git_commit: &git2::Commit<'_>) -> Result<String, GitError> {
        let tree = git_commit.tree()?;

        // Root commits are diffed against the empty tree
        let parent_tree = if git_commit.parent_count() > 0 {
            Some(git_commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut opts = DiffOptions::new();
        opts.ignore_whitespace(false);

        let diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        let author = git_commit.author();
        let mut text = format!(
            "commit {}\nAuthor: {} <{}>\n\n",
            git_commit.id(),
            author.name().unwrap_or("Unknown"),
            author.email().unwrap_or("")
        );
        for line in git_commit.message().unwrap_or("").lines() {
            text.push_str("    ");
            text.push_str(line);
            text.push('\n');
        }
        text.push('\n');

        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            let origin = line.origin();
            if matches!(origin, '+' | '-' | ' ') {
                text.push(origin);
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })?;

        Ok(text)
    }
}

impl CommitSource for GitRepo {
    fn list_commits(&self, count: usize, base_revision: &str) -> Result<Vec<Commit>, GitError> {
        let base = self.find_commit(base_revision)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL)?;
        revwalk.push(base.id())?;

        let mut git_commits = Vec::new();
        for oid_result in revwalk.take(count) {
            let oid = oid_result?;
            git_commits.push(self.repo.find_commit(oid)?);
        }

        let total = git_commits.len();
        debug!(base = %base_revision, requested = count, found = total, "Listed commits");

        // Newest first, positions counted from the oldest commit in the range
        Ok(git_commits
            .iter()
            .enumerate()
            .map(|(idx, c)| Self::extract_commit(c, total - 1 - idx))
            .collect())
    }

    fn diff(&self, sha: &str) -> Result<String, GitError> {
        let git_commit = self.find_commit(sha)?;
        self.render_patch(&git_commit)
    }

    fn rev_parse(&self, revision: &str) -> Result<String, GitError> {
        Ok(self.find_commit(revision)?.id().to_string())
    }
}
