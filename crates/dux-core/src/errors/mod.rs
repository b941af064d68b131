use std::error::Error;

/// Base trait for all application errors
pub trait DuxError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type DuxResult<T> = Result<T, Box<dyn DuxError>>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {file} at repo root ({path}). Run 'dux init' to create one.")]
    ConfigNotFound { file: &'static str, path: String },

    #[error("{path} already exists. Use --force to overwrite.")]
    AlreadyExists { path: String },

    #[error("port must be an integer between 1 and 65535, got '{value}'")]
    InvalidPort { value: String },

    #[error("IO error reading config: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DuxError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            ConfigError::AlreadyExists { .. } => "CONFIG_ALREADY_EXISTS",
            ConfigError::InvalidPort { .. } => "CONFIG_INVALID_PORT",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigNotFound { .. }
                | ConfigError::AlreadyExists { .. }
                | ConfigError::InvalidPort { .. }
        )
    }
}
