// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! On-disk layout of the rewrite metadata directory
//!
//! ```text
//! <workdir>/.git-rewrite-ai/
//!     checkpoint.json
//!     rebase-script.txt     reword todo
//!     rebase-exec.txt       exec todo
//!     rewrite.sh            bash replay script
//!     filter-branch.sh      filter-branch script
//!     messages/<sha>.txt
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ScriptError;
use crate::synth::{MessageFile, Scripts};

/// Name of the metadata directory inside the working tree
pub const METADATA_DIR: &str = ".git-rewrite-ai";

/// Paths inside a metadata directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    /// Use `root` as the metadata directory
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The metadata directory of the working tree at `workdir`
    #[must_use]
    pub fn in_workdir(workdir: &Path) -> Self {
        Self::new(workdir.join(METADATA_DIR))
    }

    /// The metadata directory itself
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `checkpoint.json`
    #[must_use]
    pub fn checkpoint(&self) -> PathBuf {
        self.root.join("checkpoint.json")
    }

    /// `rebase-script.txt`
    #[must_use]
    pub fn reword_script(&self) -> PathBuf {
        self.root.join("rebase-script.txt")
    }

    /// `rebase-exec.txt`
    #[must_use]
    pub fn exec_script(&self) -> PathBuf {
        self.root.join("rebase-exec.txt")
    }

    /// `rewrite.sh`
    #[must_use]
    pub fn bash_script(&self) -> PathBuf {
        self.root.join("rewrite.sh")
    }

    /// `filter-branch.sh`
    #[must_use]
    pub fn filter_branch_script(&self) -> PathBuf {
        self.root.join("filter-branch.sh")
    }

    /// `messages/`
    #[must_use]
    pub fn messages_dir(&self) -> PathBuf {
        self.root.join("messages")
    }
}

/// Where each artifact was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Reword todo list
    pub reword_script: PathBuf,
    /// Exec todo list
    pub exec_script: PathBuf,
    /// Bash replay script
    pub bash_script: PathBuf,
    /// Filter-branch script
    pub filter_branch_script: PathBuf,
    /// Directory holding one message file per commit
    pub messages_dir: PathBuf,
}

fn write_file(path: &Path, contents: &str) -> Result<(), ScriptError> {
    fs::write(path, contents).map_err(|source| ScriptError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(path: &Path) -> Result<(), ScriptError> {
    fs::create_dir_all(path).map_err(|source| ScriptError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), ScriptError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|source| {
        ScriptError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), ScriptError> {
    Ok(())
}

/// Write every message file into `dir`, creating it if needed
///
/// # Errors
///
/// Returns `ScriptError::Write` if the directory or a file cannot be written.
pub fn write_message_files(dir: &Path, files: &[MessageFile]) -> Result<(), ScriptError> {
    create_dir(dir)?;
    for file in files {
        write_file(&dir.join(&file.file_name), &file.contents)?;
    }
    debug!(dir = %dir.display(), count = files.len(), "Wrote message files");
    Ok(())
}

/// Write all scripts and message files under `layout`
///
/// Shell scripts are made executable. Existing files are overwritten.
///
/// # Errors
///
/// Returns `ScriptError::Write` on the first file that cannot be written.
pub fn write_artifacts(
    layout: &ArtifactLayout,
    scripts: &Scripts,
) -> Result<ArtifactPaths, ScriptError> {
    create_dir(layout.root())?;

    let paths = ArtifactPaths {
        reword_script: layout.reword_script(),
        exec_script: layout.exec_script(),
        bash_script: layout.bash_script(),
        filter_branch_script: layout.filter_branch_script(),
        messages_dir: layout.messages_dir(),
    };

    write_file(&paths.reword_script, &scripts.reword_script)?;
    write_file(&paths.exec_script, &scripts.exec_script)?;
    write_file(&paths.bash_script, &scripts.bash_script)?;
    make_executable(&paths.bash_script)?;
    write_file(&paths.filter_branch_script, &scripts.filter_branch_script)?;
    make_executable(&paths.filter_branch_script)?;
    write_message_files(&paths.messages_dir, &scripts.message_files)?;

    info!(dir = %layout.root().display(), "Wrote rewrite scripts");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::RewritePlan;
    use crate::synth::synthesize;
    use similar_asserts::assert_eq;
    use tempfile::TempDir;

    fn scripts() -> Scripts {
        let plan = RewritePlan::from_pairs([("aaa1111", "feat: x"), ("bbb2222", "fix: y")])
            .expect("plan");
        synthesize(&plan, "base000")
    }

    #[test]
    fn test_layout_paths() {
        let layout = ArtifactLayout::in_workdir(Path::new("/work"));
        assert_eq!(layout.root(), Path::new("/work/.git-rewrite-ai"));
        assert_eq!(
            layout.checkpoint(),
            PathBuf::from("/work/.git-rewrite-ai/checkpoint.json")
        );
        assert_eq!(
            layout.messages_dir(),
            PathBuf::from("/work/.git-rewrite-ai/messages")
        );
    }

    #[test]
    fn test_write_artifacts_creates_everything() {
        let dir = TempDir::new().expect("tempdir");
        let layout = ArtifactLayout::in_workdir(dir.path());
        let scripts = scripts();

        let paths = write_artifacts(&layout, &scripts).expect("write");

        let reword = fs::read_to_string(&paths.reword_script).expect("read");
        assert_eq!(reword, scripts.reword_script);
        assert!(paths.exec_script.exists());
        assert!(paths.filter_branch_script.exists());
        let message = fs::read_to_string(paths.messages_dir.join("bbb2222.txt")).expect("read");
        assert_eq!(message, "fix: y\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_scripts_are_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("tempdir");
        let paths =
            write_artifacts(&ArtifactLayout::in_workdir(dir.path()), &scripts()).expect("write");
        for path in [&paths.bash_script, &paths.filter_branch_script] {
            let mode = fs::metadata(path).expect("metadata").permissions().mode();
            assert_eq!(mode & 0o777, 0o755, "{}", path.display());
        }
    }

    #[test]
    fn test_write_artifacts_overwrites() {
        let dir = TempDir::new().expect("tempdir");
        let layout = ArtifactLayout::in_workdir(dir.path());
        fs::create_dir_all(layout.root()).expect("mkdir");
        fs::write(layout.reword_script(), "stale").expect("write");

        write_artifacts(&layout, &scripts()).expect("write");
        let reword = fs::read_to_string(layout.reword_script()).expect("read");
        assert!(reword.contains("reword aaa1111 feat: x"));
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let dir = TempDir::new().expect("tempdir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a dir").expect("write");

        let result = write_message_files(&blocker, &scripts().message_files);
        assert!(matches!(result, Err(ScriptError::Write { .. })));
    }
}
