//! Shared test utilities for VCS tests.
//!
//! Provides RepoGuard for creating temporary git repositories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Run a git command in a directory.
pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(dir)
        .args(args)
        .status()
        .expect("failed to spawn git");
    assert!(status.success(), "git command failed: {:?}", args);
}

/// Run a git command in a directory and return its stdout.
pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to spawn git");
    assert!(output.status.success(), "git command failed: {:?}", args);
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// RAII guard for a temporary git repository with an initial commit.
/// The directory is removed on drop.
pub struct RepoGuard {
    _temp: TempDir,
    pub dir: PathBuf,
}

impl RepoGuard {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dir = temp.path().to_path_buf();

        git(&dir, &["init", "--quiet"]);
        git(&dir, &["config", "user.email", "test@example.com"]);
        git(&dir, &["config", "user.name", "Test User"]);
        git(&dir, &["config", "commit.gpgsign", "false"]);
        fs::write(dir.join("README.md"), "hello\n").expect("failed to write file");
        git(&dir, &["add", "."]);
        git(&dir, &["commit", "--quiet", "-m", "init"]);

        Self { _temp: temp, dir }
    }

    /// Writes a file and commits it with one `-m` per paragraph.
    pub fn commit_file(&self, name: &str, content: &str, paragraphs: &[&str]) {
        fs::write(self.dir.join(name), content).expect("failed to write file");
        git(&self.dir, &["add", name]);

        let mut args = vec!["commit", "--quiet"];
        for paragraph in paragraphs {
            args.push("-m");
            args.push(*paragraph);
        }
        git(&self.dir, &args);
    }
}
