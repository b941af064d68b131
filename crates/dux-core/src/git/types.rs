use std::path::PathBuf;

use serde::Serialize;

/// One entry of `git worktree list --porcelain`.
///
/// Never cached: callers re-list on every query so the version-control
/// system's own bookkeeping stays the only source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorktreeRecord {
    pub path: PathBuf,
    /// Short branch name (`refs/heads/` stripped). `None` for detached or bare entries.
    pub branch: Option<String>,
}

impl WorktreeRecord {
    pub fn new(path: PathBuf, branch: Option<String>) -> Self {
        Self { path, branch }
    }
}
