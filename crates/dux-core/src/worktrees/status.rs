use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::assistants::session_name_for;
use crate::config::RepoConfig;
use crate::forge::ForgeBackend;
use crate::git;
use crate::ports::read_worktree_port;
use crate::worktrees::errors::WorktreeError;
use crate::worktrees::types::WorktreeStatus;

/// One status row per live worktree, in listing order.
///
/// Ports are only recovered when the repository has a `.dux.yml`; PR state
/// only when a forge is available. Neither lookup can fail the listing.
pub fn collect_status(
    repo_root: &Path,
    forge: Option<&dyn ForgeBackend>,
    repo_config: Option<&RepoConfig>,
    tmux_sessions: &HashSet<String>,
) -> Result<Vec<WorktreeStatus>, WorktreeError> {
    let records = git::list_worktrees(repo_root)?;

    let rows: Vec<WorktreeStatus> = records
        .into_iter()
        .filter(|r| !r.path.as_os_str().is_empty())
        .map(|record| {
            let dirty = match git::is_worktree_dirty(&record.path) {
                Ok(dirty) => Some(dirty),
                Err(e) => {
                    debug!(
                        event = "core.worktree.status_read_failed",
                        path = %record.path.display(),
                        error = %e
                    );
                    None
                }
            };
            let pr = match (forge, record.branch.as_deref()) {
                (Some(forge), Some(branch)) => forge.find_pr(branch),
                _ => None,
            };
            let port = repo_config.and_then(|c| read_worktree_port(&record.path, c.env_key()));
            let tmux_session = record
                .branch
                .as_deref()
                .is_some_and(|b| tmux_sessions.contains(&session_name_for(b)));

            WorktreeStatus {
                branch: record.branch,
                path: record.path,
                dirty,
                pr_state: pr.as_ref().map(|p| p.state.clone()),
                pr_url: pr.map(|p| p.url),
                port,
                tmux_session,
            }
        })
        .collect();

    info!(event = "core.worktree.status_completed", count = rows.len());
    Ok(rows)
}
