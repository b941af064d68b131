use crate::errors::DuxError;

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Missing dependency: {binary} not found on PATH")]
    NotInstalled { binary: String },

    #[error("tmux session '{name}' already exists")]
    SessionExists { name: String },

    #[error("tmux {command} failed: {stderr}")]
    TmuxFailed { command: String, stderr: String },

    #[error("Failed to execute {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl DuxError for AssistantError {
    fn error_code(&self) -> &'static str {
        match self {
            AssistantError::NotInstalled { .. } => "ASSISTANT_NOT_INSTALLED",
            AssistantError::SessionExists { .. } => "TMUX_SESSION_EXISTS",
            AssistantError::TmuxFailed { .. } => "TMUX_COMMAND_FAILED",
            AssistantError::SpawnFailed { .. } => "ASSISTANT_SPAWN_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            AssistantError::NotInstalled { .. } | AssistantError::SessionExists { .. }
        )
    }
}
