use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{info, warn};

/// Open `dir` in a new VS Code window. Best-effort; `false` when skipped or failed.
pub fn open_in_code(dir: &Path) -> bool {
    if which::which("code").is_err() {
        warn!(event = "core.editor.code_not_found", path = %dir.display());
        return false;
    }

    match Command::new("code")
        .arg("-n")
        .arg(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => {
            info!(event = "core.editor.open_completed", path = %dir.display());
            true
        }
        Ok(status) => {
            warn!(
                event = "core.editor.open_failed",
                path = %dir.display(),
                code = ?status.code()
            );
            false
        }
        Err(e) => {
            warn!(
                event = "core.editor.open_failed",
                path = %dir.display(),
                error = %e
            );
            false
        }
    }
}
