// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Script synthesis
//!
//! Each variant encodes the same end state (every planned commit carries its
//! new message) through a different git mechanism. All functions here are
//! pure: the output depends only on the plan and the base commit.

use std::fmt::Write as _;

use crate::escape::{amend_command, escape_message, shell_quote};
use crate::plan::{PlanEntry, RewritePlan};

/// Length of abbreviated SHAs in script comments
const COMMENT_SHA_LEN: usize = 8;

/// A message destined for `messages/<sha>.txt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFile {
    /// Full commit SHA
    pub sha: String,
    /// File name inside the messages directory
    pub file_name: String,
    /// File contents (the message plus a final newline)
    pub contents: String,
}

/// Every rewrite procedure for one plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scripts {
    /// Interactive-rebase todo with one `reword` per commit
    pub reword_script: String,
    /// Interactive-rebase todo with `pick` + `exec` amend per commit
    pub exec_script: String,
    /// Standalone bash replay script
    pub bash_script: String,
    /// Standalone `git filter-branch` script
    pub filter_branch_script: String,
    /// One message file per commit
    pub message_files: Vec<MessageFile>,
}

fn abbrev(sha: &str) -> &str {
    sha.get(..COMMENT_SHA_LEN).unwrap_or(sha)
}

/// Build every script variant for `plan` on top of `base_commit`
#[must_use]
pub fn synthesize(plan: &RewritePlan, base_commit: &str) -> Scripts {
    Scripts {
        reword_script: reword_script(plan),
        exec_script: exec_script(plan),
        bash_script: bash_script(plan, base_commit),
        filter_branch_script: filter_branch_script(plan, base_commit),
        message_files: message_files(plan),
    }
}

/// Todo list that stops at every commit for an editor hook to supply the message
#[must_use]
pub fn reword_script(plan: &RewritePlan) -> String {
    let mut todo = String::from(
        "# reword todo: each commit stops for the editor hook to write its new message\n",
    );
    for entry in plan {
        let _ = writeln!(todo, "reword {} {}", entry.sha, entry.summary());
    }
    todo
}

/// Todo list that keeps each commit and immediately amends its message
#[must_use]
pub fn exec_script(plan: &RewritePlan) -> String {
    let mut todo = String::from("# exec todo: each commit is picked, then its message amended\n");
    for entry in plan {
        let _ = writeln!(todo, "pick {} {}", entry.sha, entry.summary());
        let _ = writeln!(todo, "exec {}", amend_command(&entry.message));
    }
    todo
}

fn comment_line(script: &mut String, index: usize, total: usize, entry: &PlanEntry) {
    let _ = writeln!(
        script,
        "# [{}/{}] {} {}",
        index + 1,
        total,
        abbrev(&entry.sha),
        entry.summary()
    );
}

/// Bash script replaying the commits onto the base with new messages
///
/// Leaves a detached HEAD; moving the branch is left to the user.
#[must_use]
pub fn bash_script(plan: &RewritePlan, base_commit: &str) -> String {
    let total = plan.len();
    let mut script = String::from("#!/usr/bin/env bash\n");
    let _ = writeln!(
        script,
        "# Replays {total} commit(s) onto {} with rewritten messages.",
        abbrev(base_commit)
    );
    script.push_str("set -euo pipefail\n\n");
    script.push_str("ORIGINAL_REF=\"$(git symbolic-ref --quiet --short HEAD || git rev-parse HEAD)\"\n");
    let _ = writeln!(
        script,
        "git checkout --quiet --detach {}\n",
        shell_quote(base_commit)
    );

    for (index, entry) in plan.iter().enumerate() {
        comment_line(&mut script, index, total, entry);
        let _ = writeln!(
            script,
            "git cherry-pick --allow-empty {}",
            shell_quote(&entry.sha)
        );
        let _ = writeln!(script, "{}\n", amend_command(&entry.message));
    }

    script.push_str("echo \"Rewritten history is at $(git rev-parse HEAD).\"\n");
    script.push_str("echo \"To move your branch there: git checkout $ORIGINAL_REF && git reset --hard <that sha>\"\n");
    script
}

/// Bash script rewriting messages in place with `git filter-branch`
///
/// Every commit after the base gets a new hash, including descendants of
/// the planned range.
#[must_use]
pub fn filter_branch_script(plan: &RewritePlan, base_commit: &str) -> String {
    let total = plan.len();
    let mut script = String::from("#!/usr/bin/env bash\n");
    let _ = writeln!(
        script,
        "# Rewrites the messages of {total} commit(s) after {} with git filter-branch.",
        abbrev(base_commit)
    );
    script.push_str("# Every commit after the base on the current branch gets a new hash.\n");
    script.push_str("set -euo pipefail\n\n");
    script.push_str("MSG_DIR=\"$(mktemp -d)\"\n");
    script.push_str("trap 'rm -rf \"$MSG_DIR\"' EXIT\n");
    script.push_str("export MSG_DIR\n\n");

    for (index, entry) in plan.iter().enumerate() {
        comment_line(&mut script, index, total, entry);
        let _ = writeln!(
            script,
            "printf '%b' '{}' > \"$MSG_DIR/{}\"",
            escape_message(&entry.message),
            entry.sha
        );
    }

    script.push('\n');
    script.push_str("FILTER_BRANCH_SQUELCH_WARNING=1 git filter-branch -f --msg-filter '\n");
    script.push_str("if [ -f \"$MSG_DIR/$GIT_COMMIT\" ]; then cat \"$MSG_DIR/$GIT_COMMIT\"; else cat; fi\n");
    let _ = writeln!(script, "' {}..HEAD", shell_quote(base_commit));
    script
}

/// One file per commit holding its final message
#[must_use]
pub fn message_files(plan: &RewritePlan) -> Vec<MessageFile> {
    plan.iter()
        .map(|entry| MessageFile {
            sha: entry.sha.clone(),
            file_name: format!("{}.txt", entry.sha),
            contents: format!("{}\n", entry.message),
        })
        .collect()
}
