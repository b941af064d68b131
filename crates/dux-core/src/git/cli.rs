//! Centralized git CLI wrappers.
//!
//! Worktree bookkeeping, per-worktree config and anything touching a remote
//! go through the git CLI: it inherits the user's SSH agent and credential
//! helpers, and git2 has no support for the `--worktree` config scope.
//!
//! Each function validates user-derived arguments, logs structured events,
//! and maps errors consistently.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, info, warn};

use super::errors::GitError;
use super::operations::{is_already_deleted_error, validate_git_arg};

fn git_output<I, S>(dir: &Path, args: I) -> Result<(String, Output), GitError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let label = args
        .iter()
        .map(|a| a.as_ref().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");

    let output = Command::new("git")
        .current_dir(dir)
        .args(&args)
        .output()
        .map_err(|source| GitError::SpawnFailed { source })?;

    Ok((label, output))
}

/// Run git in `dir` and return trimmed stdout, or `CommandFailed` on a non-zero exit.
fn run_git<I, S>(dir: &Path, args: I) -> Result<String, GitError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let (label, output) = git_output(dir, args)?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(
            event = "core.git.command_failed",
            command = %label,
            path = %dir.display(),
            stderr = %stderr
        );
        Err(GitError::CommandFailed {
            command: label,
            code: output.status.code().unwrap_or(-1),
            stderr,
        })
    }
}

/// Fetch a specific branch from a remote.
pub fn fetch(dir: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
    validate_git_arg(remote, "remote name")?;
    validate_git_arg(branch, "branch name")?;

    info!(
        event = "core.git.fetch_started",
        remote = remote,
        branch = branch,
        path = %dir.display()
    );

    match run_git(dir, ["fetch", remote, branch]) {
        Ok(_) => {
            info!(event = "core.git.fetch_completed", remote = remote, branch = branch);
            Ok(())
        }
        Err(e) => {
            warn!(
                event = "core.git.fetch_failed",
                remote = remote,
                branch = branch,
                error = %e
            );
            Err(GitError::FetchFailed {
                remote: remote.to_string(),
                branch: branch.to_string(),
                message: e.to_string(),
            })
        }
    }
}

/// Drop administrative entries for worktrees whose directories are gone.
pub fn prune_worktrees(dir: &Path) -> Result<(), GitError> {
    run_git(dir, ["worktree", "prune"]).map(|_| ())
}

/// Raw `git worktree list --porcelain` output.
pub fn worktree_list_porcelain(dir: &Path) -> Result<String, GitError> {
    run_git(dir, ["worktree", "list", "--porcelain"])
}

/// Add a worktree at `path`.
///
/// With `start_point = None` the existing local `branch` is checked out;
/// otherwise a new branch is created from `start_point` (`-b`).
pub fn add_worktree(
    repo_root: &Path,
    path: &Path,
    branch: &str,
    start_point: Option<&str>,
) -> Result<(), GitError> {
    validate_git_arg(branch, "branch name")?;
    if let Some(start) = start_point {
        validate_git_arg(start, "start point")?;
    }

    info!(
        event = "core.git.worktree_add_started",
        branch = branch,
        path = %path.display(),
        start_point = start_point.unwrap_or("existing")
    );

    let mut args: Vec<&OsStr> = vec![OsStr::new("worktree"), OsStr::new("add")];
    match start_point {
        Some(start) => {
            args.extend([OsStr::new("-b"), OsStr::new(branch), path.as_os_str()]);
            args.push(OsStr::new(start));
        }
        None => args.extend([path.as_os_str(), OsStr::new(branch)]),
    }

    run_git(repo_root, args).map_err(|e| GitError::WorktreeAddFailed {
        branch: branch.to_string(),
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!(
        event = "core.git.worktree_add_completed",
        branch = branch,
        path = %path.display()
    );
    Ok(())
}

/// `git push -u <remote> <branch>`.
pub fn push_set_upstream(dir: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
    validate_git_arg(remote, "remote name")?;
    validate_git_arg(branch, "branch name")?;
    run_git(dir, ["push", "-u", remote, branch]).map(|_| ())
}

/// `git push` using the configured upstream.
pub fn push(dir: &Path) -> Result<(), GitError> {
    run_git(dir, ["push"]).map(|_| ())
}

/// Number of commits on `HEAD` not yet on its upstream.
///
/// Fails when the branch has no upstream.
pub fn commits_ahead_of_upstream(dir: &Path) -> Result<u32, GitError> {
    let count = run_git(dir, ["rev-list", "--count", "@{upstream}..HEAD"])?;
    count.parse::<u32>().map_err(|_| GitError::CommandFailed {
        command: "rev-list --count @{upstream}..HEAD".to_string(),
        code: 0,
        stderr: format!("unexpected output '{count}'"),
    })
}

/// Create an empty commit with `message`.
pub fn commit_allow_empty(dir: &Path, message: &str) -> Result<(), GitError> {
    run_git(dir, ["commit", "--allow-empty", "-m", message]).map(|_| ())
}

/// Enable `extensions.worktreeConfig` so `--worktree` writes stay private to
/// one worktree instead of falling back to the shared repository config.
pub fn enable_worktree_config(dir: &Path) -> Result<(), GitError> {
    run_git(dir, ["config", "extensions.worktreeConfig", "true"]).map(|_| ())
}

/// Read `key` from the worktree-scoped config. Unset keys are `Ok(None)`.
pub fn config_get_worktree(dir: &Path, key: &str) -> Result<Option<String>, GitError> {
    validate_git_arg(key, "config key")?;

    match run_git(dir, ["config", "--worktree", "--get", key]) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        // `git config --get` exits 1 when the key is not set
        Err(GitError::CommandFailed { code: 1, .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write `key = value` into the worktree-scoped config.
pub fn config_set_worktree(dir: &Path, key: &str, value: &str) -> Result<(), GitError> {
    validate_git_arg(key, "config key")?;
    run_git(dir, ["config", "--worktree", key, value]).map(|_| ())
}

/// `git worktree remove --force <path>`.
pub fn remove_worktree(repo_root: &Path, path: &Path) -> Result<(), GitError> {
    let args = [
        OsStr::new("worktree"),
        OsStr::new("remove"),
        OsStr::new("--force"),
        path.as_os_str(),
    ];
    run_git(repo_root, args).map_err(|e| GitError::WorktreeRemovalFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!(event = "core.git.worktree_removed", path = %path.display());
    Ok(())
}

/// Force-delete a local branch.
pub fn delete_local_branch(repo_root: &Path, branch: &str) -> Result<(), GitError> {
    validate_git_arg(branch, "branch name")?;
    run_git(repo_root, ["branch", "-D", branch]).map(|_| ())
}

/// Delete a branch from a remote.
///
/// Treats "branch already deleted" as success (idempotent).
pub fn delete_remote_branch(dir: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
    validate_git_arg(remote, "remote name")?;
    validate_git_arg(branch, "branch name")?;

    info!(
        event = "core.git.delete_remote_branch_started",
        remote = remote,
        branch = branch,
        path = %dir.display()
    );

    match run_git(dir, ["push", remote, "--delete", branch]) {
        Ok(_) => {
            info!(
                event = "core.git.delete_remote_branch_completed",
                remote = remote,
                branch = branch
            );
            Ok(())
        }
        Err(GitError::CommandFailed { stderr, .. }) if is_already_deleted_error(&stderr) => {
            info!(
                event = "core.git.delete_remote_branch_already_deleted",
                remote = remote,
                branch = branch
            );
            Ok(())
        }
        Err(e) => Err(GitError::RemoteBranchDeleteFailed {
            branch: branch.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Branch that `origin/HEAD` points at, if the remote HEAD is known locally.
pub fn origin_head_branch(dir: &Path) -> Option<String> {
    run_git(dir, ["symbolic-ref", "refs/remotes/origin/HEAD"])
        .ok()
        .and_then(|r| r.strip_prefix("refs/remotes/origin/").map(str::to_string))
        .filter(|b| !b.is_empty())
}

/// `git branch --show-current`; empty output means detached HEAD.
pub fn show_current_branch(dir: &Path) -> Result<Option<String>, GitError> {
    let branch = run_git(dir, ["branch", "--show-current"])?;
    Ok((!branch.is_empty()).then_some(branch))
}

/// Short names of remote-tracking branches (`origin/main`, ...).
pub fn remote_branches(dir: &Path) -> Result<Vec<String>, GitError> {
    let output = run_git(dir, ["branch", "-r", "--format=%(refname:short)"])?;
    Ok(output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{commit_file, init_git_repo};
    use tempfile::TempDir;

    #[test]
    fn test_add_worktree_rejects_option_injection() {
        let dir = TempDir::new().unwrap();
        let result = add_worktree(dir.path(), &dir.path().join("wt"), "--force", None);
        assert!(matches!(result, Err(GitError::InvalidArgument { .. })));
    }

    #[test]
    fn test_config_get_worktree_unset_is_none() {
        let dir = TempDir::new().unwrap();
        init_git_repo(dir.path());
        commit_file(dir.path(), "README.md", "hello", "initial");

        assert_eq!(config_get_worktree(dir.path(), "dux.port").unwrap(), None);
    }

    #[test]
    fn test_config_round_trip_in_worktree_scope() {
        let dir = TempDir::new().unwrap();
        init_git_repo(dir.path());
        commit_file(dir.path(), "README.md", "hello", "initial");

        enable_worktree_config(dir.path()).unwrap();
        config_set_worktree(dir.path(), "dux.port", "3123").unwrap();
        assert_eq!(
            config_get_worktree(dir.path(), "dux.port").unwrap(),
            Some("3123".to_string())
        );
    }

    #[test]
    fn test_worktree_list_contains_main_checkout() {
        let dir = TempDir::new().unwrap();
        init_git_repo(dir.path());
        commit_file(dir.path(), "README.md", "hello", "initial");

        let output = worktree_list_porcelain(dir.path()).unwrap();
        assert!(output.starts_with("worktree "));
        assert!(output.contains("branch refs/heads/main"));
    }

    #[test]
    fn test_show_current_branch() {
        let dir = TempDir::new().unwrap();
        init_git_repo(dir.path());
        commit_file(dir.path(), "README.md", "hello", "initial");

        assert_eq!(
            show_current_branch(dir.path()).unwrap(),
            Some("main".to_string())
        );
    }

    #[test]
    fn test_origin_head_branch_without_remote() {
        let dir = TempDir::new().unwrap();
        init_git_repo(dir.path());
        assert_eq!(origin_head_branch(dir.path()), None);
    }
}
