use std::path::PathBuf;

use crate::errors::DuxError;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Failed to copy env file {} -> {}: {source}", from.display(), to.display())]
    EnvCopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write PORT into {}: {source}", path.display())]
    EnvPortWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Install command '{command}' failed with exit code {}", code.map_or("signal".to_string(), |c| c.to_string()))]
    InstallFailed { command: String, code: Option<i32> },

    #[error("Failed to start '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl DuxError for BootstrapError {
    fn error_code(&self) -> &'static str {
        match self {
            BootstrapError::EnvCopyFailed { .. } => "BOOTSTRAP_ENV_COPY_FAILED",
            BootstrapError::EnvPortWriteFailed { .. } => "BOOTSTRAP_ENV_PORT_WRITE_FAILED",
            BootstrapError::InstallFailed { .. } => "BOOTSTRAP_INSTALL_FAILED",
            BootstrapError::SpawnFailed { .. } => "BOOTSTRAP_SPAWN_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, BootstrapError::InstallFailed { .. })
    }
}
