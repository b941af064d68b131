//! Creating and removing worktree/branch pairs.
//!
//! Only adding and removing the worktree itself can fail the caller. Pushing,
//! seeding the first commit and persisting the port are conveniences: their
//! failures are logged and reported as `false`.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::git::{self, GitError, cli};

pub use crate::ports::{ensure_env_port, set_port};

const REMOTE: &str = "origin";

/// Check out `branch` into `dir`, creating it from `origin/<base>` when it
/// does not exist locally.
pub fn add_worktree(
    repo_root: &Path,
    branch: &str,
    dir: &Path,
    base: &str,
) -> Result<(), GitError> {
    if let Some(parent) = dir.parent() {
        fs::create_dir_all(parent)?;
    }

    if git::branch_exists(repo_root, branch) {
        cli::add_worktree(repo_root, dir, branch, None)
    } else {
        let start_point = format!("{REMOTE}/{base}");
        cli::add_worktree(repo_root, dir, branch, Some(&start_point))
    }
}

/// `git push -u origin <branch>` from the worktree. Best-effort.
pub fn push_set_upstream(dir: &Path, branch: &str) -> bool {
    match cli::push_set_upstream(dir, REMOTE, branch) {
        Ok(()) => {
            info!(event = "core.worktree.push_completed", branch = branch);
            true
        }
        Err(e) => {
            warn!(
                event = "core.worktree.push_failed",
                branch = branch,
                error = %e
            );
            false
        }
    }
}

/// Give the branch a commit of its own so a PR can be opened against it.
///
/// When `HEAD` is not ahead of its upstream an empty commit is created and
/// pushed. Best-effort; a branch without upstream is left alone.
pub fn ensure_initial_commit(dir: &Path, message: &str) -> bool {
    let result = cli::commits_ahead_of_upstream(dir).and_then(|ahead| {
        if ahead > 0 {
            return Ok(false);
        }
        cli::commit_allow_empty(dir, message)?;
        cli::push(dir)?;
        Ok(true)
    });

    match result {
        Ok(committed) => {
            info!(
                event = "core.worktree.initial_commit_completed",
                path = %dir.display(),
                committed = committed
            );
            true
        }
        Err(e) => {
            warn!(
                event = "core.worktree.initial_commit_failed",
                path = %dir.display(),
                error = %e
            );
            false
        }
    }
}

/// Remove the worktree, then delete its branch locally and on origin.
///
/// # Errors
///
/// Only a failing `git worktree remove` is an error; branch deletion is
/// best-effort and an already-deleted remote branch counts as success.
pub fn remove_worktree(repo_root: &Path, path: &Path, branch: &str) -> Result<(), GitError> {
    info!(
        event = "core.worktree.remove_started",
        branch = branch,
        path = %path.display()
    );

    cli::remove_worktree(repo_root, path)?;

    if let Err(e) = cli::delete_local_branch(repo_root, branch) {
        warn!(
            event = "core.worktree.local_branch_delete_failed",
            branch = branch,
            error = %e
        );
    }
    if let Err(e) = cli::delete_remote_branch(repo_root, REMOTE, branch) {
        warn!(
            event = "core.worktree.remote_branch_delete_failed",
            branch = branch,
            error = %e
        );
    }

    info!(event = "core.worktree.remove_completed", branch = branch);
    Ok(())
}
