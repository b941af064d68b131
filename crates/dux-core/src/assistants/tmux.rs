//! tmux sessions hosting assistant processes.
//!
//! One worktree gets a session named after its branch. Several worktrees
//! share a `dux-<unix-ts>` session with one window each. Windows are
//! addressed by the ids tmux prints, so `base-index` settings do not matter.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::assistants::errors::AssistantError;
use crate::assistants::prompt::compose_assistant_prompt;
use crate::assistants::types::{AssistantKind, LaunchTarget};
use crate::bootstrap::ExternalCommand;
use crate::identity::slugify;

/// One tmux window to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmuxWindow {
    pub name: String,
    pub label: String,
    pub dir: PathBuf,
    pub command: ExternalCommand,
}

/// Whether this process runs inside a tmux client.
pub fn inside_tmux() -> bool {
    std::env::var_os("TMUX").is_some_and(|v| !v.is_empty())
}

/// tmux rewrites `.` and `:` in session names; do it up front so lookups match.
pub fn session_name_for(branch: &str) -> String {
    branch.replace(['.', ':'], "_")
}

/// Name of the shared session used when several worktrees open at once.
pub fn multi_session_name() -> String {
    format!("dux-{}", chrono::Utc::now().timestamp())
}

/// Slugified window label, or `fallback` when the label has nothing to keep.
pub fn window_name(label: &str, fallback: &str) -> String {
    if label.chars().any(|c| c.is_ascii_alphanumeric()) {
        slugify(label)
    } else {
        fallback.to_string()
    }
}

/// Windows for `targets`, each running `assistant` with its composed prompt.
pub fn plan_windows(
    targets: &[LaunchTarget],
    assistant: AssistantKind,
    auto_start: bool,
) -> Vec<TmuxWindow> {
    targets
        .iter()
        .enumerate()
        .map(|(idx, target)| {
            let fallback = if idx == 0 {
                "worktree".to_string()
            } else {
                format!("window-{}", idx + 1)
            };
            let prompt =
                compose_assistant_prompt(&target.path, &target.branch, &target.prompt, auto_start);
            TmuxWindow {
                name: window_name(&target.label, &fallback),
                label: target.label.clone(),
                dir: target.path.clone(),
                command: assistant.command(&prompt),
            }
        })
        .collect()
}

pub fn require() -> Result<(), AssistantError> {
    which::which("tmux")
        .map(|_| ())
        .map_err(|_| AssistantError::NotInstalled {
            binary: "tmux".to_string(),
        })
}

fn tmux(args: &[&str]) -> Result<String, AssistantError> {
    let output = Command::new("tmux")
        .args(args)
        .output()
        .map_err(|source| AssistantError::SpawnFailed {
            program: "tmux".to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(AssistantError::TmuxFailed {
            command: args.first().copied().unwrap_or_default().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Names of running sessions; empty when tmux has no server or is missing.
pub fn list_sessions() -> HashSet<String> {
    match tmux(&["list-sessions", "-F", "#{session_name}"]) {
        Ok(out) => out.lines().map(str::to_string).collect(),
        Err(e) => {
            debug!(event = "core.tmux.list_sessions_failed", error = %e);
            HashSet::new()
        }
    }
}

fn send_command(window_id: &str, command: &ExternalCommand) -> Result<(), AssistantError> {
    tmux(&["send-keys", "-t", window_id, &command.to_shell_line(), "C-m"])?;
    Ok(())
}

/// Create detached session `session` holding `windows`, in order.
///
/// # Errors
///
/// `SessionExists` if the name is taken; any failing tmux call aborts.
pub fn create_session(session: &str, windows: &[TmuxWindow]) -> Result<(), AssistantError> {
    if list_sessions().contains(session) {
        return Err(AssistantError::SessionExists {
            name: session.to_string(),
        });
    }
    let Some((first, rest)) = windows.split_first() else {
        return Ok(());
    };

    info!(
        event = "core.tmux.session_create_started",
        session = session,
        windows = windows.len()
    );

    let dir = path_arg(&first.dir);
    let window_id = tmux(&[
        "new-session", "-d", "-P", "-F", "#{window_id}", "-s", session, "-c", &dir, "-n",
        &first.name,
    ])?;
    send_command(&window_id, &first.command)?;

    for window in rest {
        let dir = path_arg(&window.dir);
        let window_id = tmux(&[
            "new-window", "-P", "-F", "#{window_id}", "-t", session, "-c", &dir, "-n",
            &window.name,
        ])?;
        send_command(&window_id, &window.command)?;
    }

    info!(event = "core.tmux.session_create_completed", session = session);
    Ok(())
}

/// Switch the current client (inside tmux) or attach (outside). Blocks while attached.
pub fn attach_or_switch(session: &str) -> Result<(), AssistantError> {
    let verb = if inside_tmux() { "switch-client" } else { "attach-session" };
    let status = Command::new("tmux")
        .args([verb, "-t", session])
        .status()
        .map_err(|source| AssistantError::SpawnFailed {
            program: "tmux".to_string(),
            source,
        })?;
    if !status.success() {
        return Err(AssistantError::TmuxFailed {
            command: verb.to_string(),
            stderr: format!("exit status {:?}", status.code()),
        });
    }
    Ok(())
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(label: &str, branch: &str) -> LaunchTarget {
        LaunchTarget {
            path: PathBuf::from(format!("/repo/.wt/{branch}")),
            branch: branch.to_string(),
            label: label.to_string(),
            prompt: "Task".to_string(),
        }
    }

    #[test]
    fn test_session_name_replaces_tmux_separators() {
        assert_eq!(session_name_for("issue/12-fix-login"), "issue/12-fix-login");
        assert_eq!(session_name_for("work/v1.2:rc"), "work/v1_2_rc");
    }

    #[test]
    fn test_multi_session_name_is_timestamped() {
        let name = multi_session_name();
        let ts: i64 = name.strip_prefix("dux-").unwrap().parse().unwrap();
        assert!(ts > 1_600_000_000);
    }

    #[test]
    fn test_window_name_slugifies_label() {
        assert_eq!(window_name("Issue #12", "worktree"), "issue-12");
        assert_eq!(window_name("work/add-dark-mode", "worktree"), "work-add-dark-mode");
        assert_eq!(window_name("!!!", "window-3"), "window-3");
    }

    #[test]
    fn test_plan_windows_one_per_target() {
        let targets = vec![target("Issue #1", "issue/1-a"), target("", "issue/2-b")];
        let windows = plan_windows(&targets, AssistantKind::Claude, true);

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].name, "issue-1");
        assert_eq!(windows[1].name, "window-2");
        assert_eq!(windows[1].dir, PathBuf::from("/repo/.wt/issue/2-b"));
        let line = windows[0].command.to_shell_line();
        assert!(line.starts_with("claude --dangerously-skip-permissions 'IMPORTANT:"));
        assert!(line.contains("branch: issue/1-a"));
    }
}
