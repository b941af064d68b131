use crate::errors::DuxError;

#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    #[error("Missing dependency: {binary} not found on PATH")]
    NotInstalled { binary: &'static str },

    #[error("Invalid issue number '{value}'")]
    InvalidIssueNumber { value: String },

    #[error("gh {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Failed to parse gh output for {command}: {message}")]
    ParseFailed { command: String, message: String },

    #[error("Failed to execute gh: {source}")]
    SpawnFailed {
        #[source]
        source: std::io::Error,
    },
}

impl DuxError for ForgeError {
    fn error_code(&self) -> &'static str {
        match self {
            ForgeError::NotInstalled { .. } => "FORGE_NOT_INSTALLED",
            ForgeError::InvalidIssueNumber { .. } => "FORGE_INVALID_ISSUE_NUMBER",
            ForgeError::CommandFailed { .. } => "FORGE_COMMAND_FAILED",
            ForgeError::ParseFailed { .. } => "FORGE_PARSE_FAILED",
            ForgeError::SpawnFailed { .. } => "FORGE_SPAWN_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ForgeError::NotInstalled { .. } | ForgeError::InvalidIssueNumber { .. }
        )
    }
}
