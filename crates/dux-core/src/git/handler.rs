use std::path::{Path, PathBuf};

use git2::{BranchType, Repository, StatusOptions};
use tracing::{debug, info, warn};

use crate::git::{cli, errors::GitError, operations, types::WorktreeRecord};

/// Root of the main working copy for the repository containing the current directory.
pub fn repo_root() -> Result<PathBuf, GitError> {
    let current_dir = std::env::current_dir()?;
    repo_root_at(&current_dir)
}

/// Root of the main working copy for the repository containing `path`.
///
/// When `path` is inside a linked worktree the main checkout is returned,
/// so `.wt/` never nests inside another worktree.
///
/// # Errors
///
/// Returns `GitError::NotInRepository` if `path` is not inside a repository
/// or the repository is bare.
pub fn repo_root_at(path: &Path) -> Result<PathBuf, GitError> {
    let repo = Repository::discover(path).map_err(|e| {
        debug!(
            event = "core.git.repo.discover_failed",
            path = %path.display(),
            error = %e
        );
        GitError::NotInRepository
    })?;

    // A linked worktree's git dir is `<root>/.git/worktrees/<name>/`.
    let root = if repo.is_worktree() {
        repo.path().ancestors().nth(3).map(Path::to_path_buf)
    } else {
        repo.workdir().map(Path::to_path_buf)
    }
    .ok_or(GitError::NotInRepository)?;

    let root = root.canonicalize().unwrap_or(root);
    debug!(event = "core.git.repo.root_resolved", root = %root.display());
    Ok(root)
}

/// Whether a local branch named `branch` exists.
pub fn branch_exists(repo_root: &Path, branch: &str) -> bool {
    match Repository::open(repo_root) {
        Ok(repo) => repo.find_branch(branch, BranchType::Local).is_ok(),
        Err(e) => {
            warn!(
                event = "core.git.repo.open_failed",
                path = %repo_root.display(),
                error = %e
            );
            false
        }
    }
}

/// Detect the repository's default branch.
///
/// Order: `origin/HEAD`, the currently checked-out branch, the first of
/// `dev`, `develop`, `main`, `master` present on origin, then `main`.
pub fn default_branch(repo_root: &Path) -> String {
    if let Some(branch) = cli::origin_head_branch(repo_root) {
        debug!(event = "core.git.default_branch.origin_head", branch = %branch);
        return branch;
    }

    if let Ok(Some(branch)) = cli::show_current_branch(repo_root) {
        debug!(event = "core.git.default_branch.current", branch = %branch);
        return branch;
    }

    if let Ok(remotes) = cli::remote_branches(repo_root) {
        for candidate in ["dev", "develop", "main", "master"] {
            let remote_ref = format!("origin/{candidate}");
            if remotes.iter().any(|r| r == &remote_ref) {
                debug!(event = "core.git.default_branch.remote", branch = candidate);
                return candidate.to_string();
            }
        }
    }

    "main".to_string()
}

/// Current branch of the checkout at `dir`, `None` when detached.
pub fn current_branch(dir: &Path) -> Result<Option<String>, GitError> {
    cli::show_current_branch(dir)
}

/// Enumerate live worktrees from `git worktree list --porcelain`.
///
/// Re-parsed on every call; nothing is cached.
pub fn list_worktrees(repo_root: &Path) -> Result<Vec<WorktreeRecord>, GitError> {
    let output = cli::worktree_list_porcelain(repo_root)?;
    let records = operations::parse_worktree_list(&output);

    info!(
        event = "core.git.worktree_list_completed",
        repo_root = %repo_root.display(),
        count = records.len()
    );

    Ok(records)
}

/// Whether the worktree at `path` has staged, modified or untracked files.
pub fn is_worktree_dirty(path: &Path) -> Result<bool, GitError> {
    let repo = Repository::open(path)?;
    let mut opts = StatusOptions::new();
    opts.include_untracked(true);
    opts.include_ignored(false);

    let statuses = repo.statuses(Some(&mut opts))?;
    Ok(!statuses.is_empty())
}
