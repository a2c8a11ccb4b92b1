use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::backend::{VcsBackend, VcsError};

/// Separates commit messages in `git log` output; written by git for `%x00`.
const RECORD_SEP: char = '\0';

/// Git backend using git CLI commands.
pub struct GitBackend {
    workdir: Option<PathBuf>,
    exclusions: Vec<String>,
}

impl GitBackend {
    pub fn new() -> Self {
        GitBackend {
            workdir: None,
            exclusions: Vec::new(),
        }
    }

    /// Runs git in `dir` instead of the current directory.
    #[cfg(test)]
    pub fn at(dir: &Path) -> Self {
        GitBackend {
            workdir: Some(dir.to_path_buf()),
            exclusions: Vec::new(),
        }
    }

    /// Pathspecs left out of the staged diff.
    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions = exclusions;
        self
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn run_git(&self, args: &[&str]) -> Result<String, VcsError> {
        debug!("running git {}", args.join(" "));
        let output = self.git().args(args).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(VcsError::CommandFailed(stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn pathspec_args(&self) -> Vec<String> {
        if self.exclusions.is_empty() {
            return Vec::new();
        }

        let mut args = vec!["--".to_string(), ".".to_string()];
        args.extend(
            self.exclusions
                .iter()
                .map(|path| format!(":(exclude){}", path)),
        );
        args
    }
}

impl Default for GitBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the argument list for `git commit`, one `-m` per paragraph.
pub fn commit_args(paragraphs: &[String]) -> Vec<String> {
    let mut args = vec!["commit".to_string()];
    for paragraph in paragraphs {
        args.push("-m".to_string());
        args.push(paragraph.clone());
    }
    args
}

impl VcsBackend for GitBackend {
    fn staged_diff(&self) -> Result<String, VcsError> {
        let pathspecs = self.pathspec_args();
        let mut args = vec!["diff", "--staged", "--no-color"];
        args.extend(pathspecs.iter().map(String::as_str));

        self.run_git(&args)
    }

    fn recent_commit_messages(&self, count: usize) -> Result<Vec<String>, VcsError> {
        let count = count.to_string();
        let output = self.run_git(&["log", "-n", &count, "--pretty=format:%B%x00"])?;

        Ok(output
            .split(RECORD_SEP)
            .map(|msg| msg.trim().to_string())
            .filter(|msg| !msg.is_empty())
            .collect())
    }

    fn root_dir_name(&self) -> Result<String, VcsError> {
        let output = self.run_git(&["rev-parse", "--show-toplevel"])?;
        let top_level = output.trim();

        Path::new(top_level)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| VcsError::Other(format!("unexpected top-level path '{}'", top_level)))
    }

    fn commit(&self, paragraphs: &[String]) -> Result<(), VcsError> {
        let args = commit_args(paragraphs);
        debug!("running git commit with {} message paragraph(s)", paragraphs.len());

        let status = self.git().args(&args).status()?;
        if !status.success() {
            return Err(VcsError::CommitFailed(format!("git commit exited with {}", status)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::test_utils::{git, git_output, RepoGuard};
    use std::fs;

    #[test]
    fn test_staged_diff_empty_when_nothing_staged() {
        let repo = RepoGuard::new();
        let backend = GitBackend::at(&repo.dir);

        let diff = backend.staged_diff().expect("should get diff");
        assert!(diff.is_empty());
    }

    #[test]
    fn test_staged_diff_excludes_unstaged_changes() {
        let repo = RepoGuard::new();
        fs::write(repo.dir.join("README.md"), "staged change\n").unwrap();
        git(&repo.dir, &["add", "README.md"]);
        fs::write(repo.dir.join("README.md"), "staged change\nunstaged change\n").unwrap();

        let diff = GitBackend::at(&repo.dir).staged_diff().unwrap();
        assert!(diff.contains("staged change"));
        assert!(!diff.contains("unstaged change"));
        assert!(!diff.contains("\x1b["), "diff should be uncoloured");
    }

    #[test]
    fn test_staged_diff_honours_exclusions() {
        let repo = RepoGuard::new();
        fs::write(repo.dir.join("Cargo.lock"), "lock\n").unwrap();
        fs::write(repo.dir.join("main.rs"), "fn main() {}\n").unwrap();
        git(&repo.dir, &["add", "."]);

        let diff = GitBackend::at(&repo.dir)
            .with_exclusions(vec!["Cargo.lock".to_string()])
            .staged_diff()
            .unwrap();
        assert!(diff.contains("main.rs"));
        assert!(!diff.contains("Cargo.lock"));
    }

    #[test]
    fn test_recent_commit_messages_keeps_paragraphs_together() {
        let repo = RepoGuard::new();
        repo.commit_file("a.txt", "a\n", &["Add a", "Body of a"]);
        repo.commit_file("b.txt", "b\n", &["Add b"]);

        let messages = GitBackend::at(&repo.dir).recent_commit_messages(5).unwrap();
        assert_eq!(
            messages,
            vec![
                "Add b".to_string(),
                "Add a\n\nBody of a".to_string(),
                "init".to_string()
            ]
        );
    }

    #[test]
    fn test_recent_commit_messages_limits_count() {
        let repo = RepoGuard::new();
        repo.commit_file("a.txt", "a\n", &["Add a"]);

        let messages = GitBackend::at(&repo.dir).recent_commit_messages(1).unwrap();
        assert_eq!(messages, vec!["Add a".to_string()]);
    }

    #[test]
    fn test_root_dir_name() {
        let repo = RepoGuard::new();
        let expected = repo.dir.file_name().unwrap().to_string_lossy().to_string();

        let name = GitBackend::at(&repo.dir).root_dir_name().unwrap();
        assert_eq!(name, expected);
    }

    #[test]
    fn test_metadata_fails_outside_repository() {
        let dir = tempfile::TempDir::new().unwrap();
        let backend = GitBackend::at(dir.path());

        assert!(matches!(
            backend.root_dir_name(),
            Err(VcsError::CommandFailed(_))
        ));
        assert!(backend.recent_commit_messages(3).is_err());
    }

    #[test]
    fn test_commit_args_one_flag_per_paragraph() {
        let paragraphs = vec!["Title".to_string(), "Body line 1".to_string()];
        assert_eq!(
            commit_args(&paragraphs),
            vec!["commit", "-m", "Title", "-m", "Body line 1"]
        );
    }

    #[test]
    fn test_commit_writes_title_and_body() {
        let repo = RepoGuard::new();
        fs::write(repo.dir.join("new.txt"), "new\n").unwrap();
        git(&repo.dir, &["add", "new.txt"]);

        GitBackend::at(&repo.dir)
            .commit(&[
                "Add new file".to_string(),
                "Body line 1".to_string(),
                "Body line 2".to_string(),
            ])
            .expect("commit should succeed");

        let message = git_output(&repo.dir, &["log", "-n", "1", "--format=%B"]);
        assert_eq!(message.trim(), "Add new file\n\nBody line 1\n\nBody line 2");
    }

    #[test]
    fn test_commit_with_nothing_staged_fails() {
        let repo = RepoGuard::new();

        let result = GitBackend::at(&repo.dir).commit(&["Empty".to_string()]);
        assert!(matches!(result, Err(VcsError::CommitFailed(_))));
    }
}
