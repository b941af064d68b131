use std::path::Path;

use tracing::{debug, info};

use crate::forge::ForgeBackend;
use crate::git;
use crate::worktrees::errors::WorktreeError;
use crate::worktrees::lifecycle;
use crate::worktrees::types::{CleanOutcome, CleanResult};

const PROTECTED_BRANCHES: &[&str] = &["main", "master"];

/// Remove worktrees whose pull request is merged, or every worktree with `all`.
///
/// The main checkout and `main`/`master` are never touched. A failing
/// removal is recorded and the loop moves on.
pub fn clean_worktrees(
    repo_root: &Path,
    forge: &dyn ForgeBackend,
    all: bool,
) -> Result<Vec<CleanResult>, WorktreeError> {
    let records = git::list_worktrees(repo_root)?;
    let mut results = Vec::new();

    for record in records {
        let Some(branch) = record.branch else {
            continue;
        };
        if record.path.as_os_str().is_empty()
            || record.path == repo_root
            || PROTECTED_BRANCHES.contains(&branch.as_str())
        {
            continue;
        }

        if !all {
            let merged = forge.find_pr(&branch).is_some_and(|pr| pr.is_merged());
            if !merged {
                debug!(event = "core.worktree.clean_kept", branch = %branch);
                continue;
            }
        }

        let outcome = match lifecycle::remove_worktree(repo_root, &record.path, &branch) {
            Ok(()) => CleanOutcome::Removed,
            Err(e) => CleanOutcome::Failed(e.to_string()),
        };
        results.push(CleanResult {
            branch,
            path: record.path,
            outcome,
        });
    }

    info!(
        event = "core.worktree.clean_completed",
        removed = results
            .iter()
            .filter(|r| r.outcome == CleanOutcome::Removed)
            .count(),
        failed = results
            .iter()
            .filter(|r| matches!(r.outcome, CleanOutcome::Failed(_)))
            .count()
    );
    Ok(results)
}
