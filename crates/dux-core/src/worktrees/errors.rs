use crate::errors::DuxError;

#[derive(Debug, thiserror::Error)]
pub enum WorktreeError {
    #[error("Git operation failed: {source}")]
    GitError {
        #[from]
        source: crate::git::GitError,
    },

    #[error("{source}")]
    PortError {
        #[from]
        source: crate::ports::PortError,
    },

    #[error("Bootstrap failed: {source}")]
    BootstrapError {
        #[from]
        source: crate::bootstrap::BootstrapError,
    },

    #[error("GitHub operation failed: {source}")]
    ForgeError {
        #[from]
        source: crate::forge::ForgeError,
    },

    #[error("{source}")]
    ConfigError {
        #[from]
        source: crate::errors::ConfigError,
    },
}

impl DuxError for WorktreeError {
    fn error_code(&self) -> &'static str {
        match self {
            WorktreeError::GitError { source } => source.error_code(),
            WorktreeError::PortError { source } => source.error_code(),
            WorktreeError::BootstrapError { source } => source.error_code(),
            WorktreeError::ForgeError { source } => source.error_code(),
            WorktreeError::ConfigError { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            WorktreeError::GitError { source } => source.is_user_error(),
            WorktreeError::PortError { source } => source.is_user_error(),
            WorktreeError::BootstrapError { source } => source.is_user_error(),
            WorktreeError::ForgeError { source } => source.is_user_error(),
            WorktreeError::ConfigError { source } => source.is_user_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortError;

    #[test]
    fn test_port_error_keeps_code_and_message() {
        let error: WorktreeError = PortError::InvalidSpan.into();
        assert_eq!(error.error_code(), "PORT_INVALID_SPAN");
        assert_eq!(
            error.to_string(),
            "Invalid port span: must be greater than 0"
        );
        assert!(error.is_user_error());
    }
}
