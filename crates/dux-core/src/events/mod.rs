//! Application lifecycle events shared by every command.

use tracing::{error, info, warn};

use crate::errors::DuxError;

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

/// Record a failure that reached the command layer.
///
/// User errors (bad input, missing config) are warnings; everything else is
/// logged as an error together with its stable code.
pub fn log_app_error<E: DuxError + ?Sized>(error: &E) {
    if error.is_user_error() {
        warn!(
            event = "core.app.error_occurred",
            code = error.error_code(),
            user_error = true,
            error = %error
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            code = error.error_code(),
            user_error = false,
            error = %error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;

    #[test]
    fn test_app_events() {
        log_app_startup();

        log_app_error(&ConfigError::InvalidPort {
            value: "abc".to_string(),
        });
        let boxed: Box<dyn DuxError> = Box::new(ConfigError::AlreadyExists {
            path: ".dux.yml".to_string(),
        });
        log_app_error(boxed.as_ref());
    }
}
