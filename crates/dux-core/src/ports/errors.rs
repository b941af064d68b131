use crate::errors::DuxError;
use crate::git::GitError;

#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error(
        "No free port found for '{branch}' in probe window {first}..={last} (base {base_port}, span {span}). Increase DUX_PORT_SPAN."
    )]
    Exhausted {
        branch: String,
        base_port: u16,
        span: u32,
        first: u32,
        last: u32,
    },

    #[error("Invalid port span: must be greater than 0")]
    InvalidSpan,

    #[error("Could not enumerate worktree ports: {source}")]
    WorktreeListFailed {
        #[from]
        source: GitError,
    },
}

impl DuxError for PortError {
    fn error_code(&self) -> &'static str {
        match self {
            PortError::Exhausted { .. } => "PORT_EXHAUSTED",
            PortError::InvalidSpan => "PORT_INVALID_SPAN",
            PortError::WorktreeListFailed { .. } => "PORT_WORKTREE_LIST_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, PortError::Exhausted { .. } | PortError::InvalidSpan)
    }
}
