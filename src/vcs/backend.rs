use thiserror::Error;

/// Error types for VCS operations.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("commit failed: {0}")]
    CommitFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// The repository operations the tool needs.
pub trait VcsBackend {
    /// Diff of the staged changes. Empty when nothing is staged.
    fn staged_diff(&self) -> Result<String, VcsError>;

    /// Full messages of the last `count` commits, newest first.
    fn recent_commit_messages(&self, count: usize) -> Result<Vec<String>, VcsError>;

    /// Name of the repository's top-level directory.
    fn root_dir_name(&self) -> Result<String, VcsError>;

    /// Commits the staged changes, passing each paragraph as its own `-m` argument.
    fn commit(&self, paragraphs: &[String]) -> Result<(), VcsError>;
}
