use std::path::PathBuf;

use tracing::error;

use dux_core::{DuxError, events, git};

/// Fail with a readable message when `binary` is not on PATH.
pub fn require_binary(binary: &str) -> Result<(), Box<dyn std::error::Error>> {
    if which::which(binary).is_ok() {
        return Ok(());
    }
    eprintln!("❌ Missing dependency: {binary} not found on PATH");
    error!(event = "cli.dependency_missing", binary = binary);
    Err(format!("{binary} not found on PATH").into())
}

/// Repository root, reporting "not a git repository" the same way everywhere.
pub fn repo_root_or_report() -> Result<PathBuf, Box<dyn std::error::Error>> {
    git::repo_root().map_err(|e| {
        eprintln!("❌ {e}");
        error!(event = "cli.repo_not_found", error = %e);
        events::log_app_error(&e);
        e.into()
    })
}

/// Print a failure, log it at the right level, and hand it back as a boxed error.
pub fn report_failure<E>(prefix: &str, event: &'static str, e: E) -> Box<dyn std::error::Error>
where
    E: DuxError,
{
    eprintln!("❌ {prefix}: {e}");
    if e.is_user_error() {
        tracing::warn!(event = event, code = e.error_code(), error = %e);
    } else {
        error!(event = event, code = e.error_code(), error = %e);
    }
    Box::new(e)
}
