use std::path::PathBuf;

use crate::errors::DuxError;

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Not in a git repository")]
    NotInRepository,

    #[error("Invalid {label}: {message}")]
    InvalidArgument { label: String, message: String },

    #[error("Failed to fetch '{branch}' from '{remote}': {message}")]
    FetchFailed {
        remote: String,
        branch: String,
        message: String,
    },

    #[error("Failed to add worktree for '{branch}' at {}: {message}", path.display())]
    WorktreeAddFailed {
        branch: String,
        path: PathBuf,
        message: String,
    },

    #[error("Failed to remove worktree at {}: {message}", path.display())]
    WorktreeRemovalFailed { path: PathBuf, message: String },

    #[error("Failed to delete remote branch '{branch}': {message}")]
    RemoteBranchDeleteFailed { branch: String, message: String },

    #[error("git {command} failed (exit {code}): {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Failed to execute git: {source}")]
    SpawnFailed {
        #[source]
        source: std::io::Error,
    },

    #[error("Git2 library error: {source}")]
    Git2Error {
        #[from]
        source: git2::Error,
    },

    #[error("IO error during git operation: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DuxError for GitError {
    fn error_code(&self) -> &'static str {
        match self {
            GitError::NotInRepository => "NOT_IN_REPOSITORY",
            GitError::InvalidArgument { .. } => "GIT_INVALID_ARGUMENT",
            GitError::FetchFailed { .. } => "GIT_FETCH_FAILED",
            GitError::WorktreeAddFailed { .. } => "WORKTREE_ADD_FAILED",
            GitError::WorktreeRemovalFailed { .. } => "WORKTREE_REMOVAL_FAILED",
            GitError::RemoteBranchDeleteFailed { .. } => "REMOTE_BRANCH_DELETE_FAILED",
            GitError::CommandFailed { .. } => "GIT_COMMAND_FAILED",
            GitError::SpawnFailed { .. } => "GIT_SPAWN_FAILED",
            GitError::Git2Error { .. } => "GIT2_ERROR",
            GitError::IoError { .. } => "GIT_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            GitError::NotInRepository | GitError::InvalidArgument { .. }
        )
    }
}
