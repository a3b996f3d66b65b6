//! Integration tests for reword
//!
//! These tests run the pipeline against real repositories built with `git2`,
//! and on unix let `git rebase -i` apply the generated todo lists.

use std::path::Path;
use std::process::Command;

use git2::{Repository, Signature};
use reword_ai::{AiError, TextGenerator};
use reword_cli::apply::Applier;
use reword_cli::checkpoint::CheckpointStore;
use reword_cli::config::Strategy;
use reword_cli::pipeline::{Rewriter, RunOptions};
use reword_git::{GitCommandRunner, GitRepo};
use reword_script::{ArtifactLayout, RewritePlan};
use similar_asserts::assert_eq;
use tempfile::TempDir;

/// Answers with the message whose file name appears in the prompt's diff
struct ByFile(Vec<(&'static str, &'static str)>);

impl TextGenerator for ByFile {
    fn generate(&self, prompt: &str, _max_output_tokens: u32) -> Result<String, AiError> {
        self.0
            .iter()
            .find(|(file, _)| prompt.contains(&format!("+++ b/{file}")))
            .map(|(_, message)| (*message).to_string())
            .ok_or(AiError::MissingApiKey)
    }
}

fn commit_file(repo: &Repository, file: &str, content: &str, message: &str) -> String {
    let workdir = repo.workdir().expect("workdir");
    std::fs::write(workdir.join(file), content).expect("write file");

    let mut index = repo.index().expect("index");
    index.add_path(Path::new(file)).expect("add path");
    index.write().expect("write index");
    let tree = repo
        .find_tree(index.write_tree().expect("write tree"))
        .expect("find tree");
    let sig = Signature::now("Test Author", "test@example.com").expect("signature");

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit")
        .to_string()
}

/// A root commit followed by `wip` commits touching file1..=file3
fn scratch_repo() -> (TempDir, Vec<String>) {
    let dir = TempDir::new().expect("tempdir");
    let repo = Repository::init(dir.path()).expect("init");
    {
        let mut config = repo.config().expect("config");
        config.set_str("user.name", "Test Author").expect("name");
        config.set_str("user.email", "test@example.com").expect("email");
    }
    commit_file(&repo, "README", "root\n", "initial");
    let shas = (1..=3)
        .map(|i| {
            commit_file(
                &repo,
                &format!("file{i}.txt"),
                &format!("{i}\n"),
                &format!("wip {i}"),
            )
        })
        .collect();
    (dir, shas)
}

fn messages() -> ByFile {
    ByFile(vec![
        ("file1.txt", "feat: add file one"),
        (
            "file2.txt",
            "fix: handle O'Brien's \"quote\" and \\ paths\n\nSecond line with $HOME",
        ),
        ("file3.txt", "chore: add file three"),
    ])
}

fn head_messages(dir: &Path, count: usize) -> Vec<String> {
    let repo = Repository::open(dir).expect("open");
    let mut walk = repo.revwalk().expect("revwalk");
    walk.push_head().expect("push head");
    let mut out: Vec<String> = walk
        .take(count)
        .map(|oid| {
            let commit = repo.find_commit(oid.expect("oid")).expect("commit");
            commit.message().unwrap_or("").trim_end().to_string()
        })
        .collect();
    out.reverse();
    out
}

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

#[test]
fn test_dry_run_against_real_repository() {
    let (dir, shas) = scratch_repo();
    let repo = GitRepo::open(dir.path()).expect("open");
    let layout = ArtifactLayout::in_workdir(dir.path());
    let store = CheckpointStore::new(layout.checkpoint());
    let generator = messages();

    let outcome = Rewriter::new(&repo, &generator, &store)
        .with_layout(layout.clone())
        .run(&RunOptions::dry_run(3))
        .expect("run");

    let planned: Vec<&str> = outcome.plan.iter().map(|e| e.sha.as_str()).collect();
    let expected: Vec<&str> = shas.iter().map(String::as_str).collect();
    assert_eq!(planned, expected);
    assert_eq!(outcome.plan.entries()[0].message, "feat: add file one");
    assert!(store.path().exists());
    assert!(!layout.reword_script().exists(), "dry run writes no scripts");
}

#[test]
fn test_apply_mode_writes_scripts_for_parent_of_oldest() {
    let (dir, shas) = scratch_repo();
    let repo = GitRepo::open(dir.path()).expect("open");
    let layout = ArtifactLayout::in_workdir(dir.path());
    let store = CheckpointStore::new(layout.checkpoint());
    let generator = messages();

    let outcome = Rewriter::new(&repo, &generator, &store)
        .with_layout(layout.clone())
        .run(&RunOptions::apply(2))
        .expect("run");

    assert_eq!(outcome.base_commit.as_deref(), Some(shas[0].as_str()));
    let bash = std::fs::read_to_string(layout.bash_script()).expect("bash script");
    assert!(bash.contains(&format!("git checkout --quiet --detach '{}'", shas[0])));
    assert!(layout.messages_dir().join(format!("{}.txt", shas[2])).exists());
}

#[test]
fn test_range_reaching_root_commit_is_rejected() {
    let (dir, _shas) = scratch_repo();
    let repo = GitRepo::open(dir.path()).expect("open");
    let layout = ArtifactLayout::in_workdir(dir.path());
    let store = CheckpointStore::new(layout.checkpoint());
    let generator = messages();

    let result = Rewriter::new(&repo, &generator, &store)
        .with_layout(layout)
        .run(&RunOptions::apply(4));
    assert!(result.is_err());
}

fn execute(dir: &Path, strategy: Strategy, editor: &str) {
    let repo = GitRepo::open(dir).expect("open");
    let layout = ArtifactLayout::in_workdir(dir);
    let store = CheckpointStore::new(layout.checkpoint());
    let generator = messages();
    let runner = GitCommandRunner;

    let outcome = Rewriter::new(&repo, &generator, &store)
        .with_layout(layout.clone())
        .with_applier(Applier::new(&runner, dir, layout, editor))
        .with_confirmation(Box::new(|_: &RewritePlan, _: &str| true))
        .run(&RunOptions::apply(3).with_execute(strategy))
        .expect("rewrite");
    assert!(outcome.applied);
}

fn expected_messages() -> Vec<String> {
    messages().0.iter().map(|(_, m)| (*m).to_string()).collect()
}

#[cfg(unix)]
#[test]
fn test_exec_strategy_rewrites_history() {
    if !git_available() {
        return;
    }
    let (dir, _shas) = scratch_repo();
    execute(dir.path(), Strategy::Exec, "unused");
    assert_eq!(head_messages(dir.path(), 3), expected_messages());
    assert_eq!(head_messages(dir.path(), 4)[0], "initial");
}

#[cfg(unix)]
#[test]
fn test_reword_strategy_rewrites_history_through_editor_hook() {
    if !git_available() {
        return;
    }
    let (dir, _shas) = scratch_repo();
    execute(dir.path(), Strategy::Reword, env!("CARGO_BIN_EXE_reword"));
    assert_eq!(head_messages(dir.path(), 3), expected_messages());
}
