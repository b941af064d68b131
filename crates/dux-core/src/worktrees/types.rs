use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::assistants::LaunchTarget;
use crate::bootstrap::BootstrapReport;
use crate::config::{Config, RepoConfig};

/// Whether a request produced a new worktree or found one already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CreateStatus {
    Created,
    Exists,
}

/// Result of one create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeOutcome {
    pub status: CreateStatus,
    pub branch: String,
    pub path: PathBuf,
    /// `Issue #N` for issue worktrees, the branch otherwise.
    pub label: String,
    pub assistant_prompt: String,
    pub issue_url: Option<String>,
    pub pr_url: Option<String>,
    pub port: Option<u16>,
    pub bootstrap: Option<BootstrapReport>,
}

impl WorktreeOutcome {
    pub(crate) fn exists(branch: String, path: PathBuf, label: String, prompt: String) -> Self {
        Self {
            status: CreateStatus::Exists,
            branch,
            path,
            label,
            assistant_prompt: prompt,
            issue_url: None,
            pr_url: None,
            port: None,
            bootstrap: None,
        }
    }

    pub fn launch_target(&self) -> LaunchTarget {
        LaunchTarget {
            path: self.path.clone(),
            branch: self.branch.clone(),
            label: self.label.clone(),
            prompt: self.assistant_prompt.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    /// Branch new worktrees start from (`origin/<base_branch>`) and PRs target.
    pub base_branch: String,
    /// Open PRs as drafts.
    pub draft_pr: bool,
    /// Apply `.dux.yml` setup after creation.
    pub bootstrap: bool,
}

/// Everything a create request needs besides the unit of work itself.
#[derive(Debug, Clone, Copy)]
pub struct CreateContext<'a> {
    pub repo_root: &'a Path,
    /// `None` when `.dux.yml` is absent; no port is allocated then.
    pub repo_config: Option<&'a RepoConfig>,
    pub settings: &'a Config,
    pub options: &'a CreateOptions,
}

/// One row of `dux status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorktreeStatus {
    pub branch: Option<String>,
    pub path: PathBuf,
    /// `None` when the status could not be read.
    pub dirty: Option<bool>,
    pub pr_state: Option<String>,
    pub pr_url: Option<String>,
    pub port: Option<u16>,
    pub tmux_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    Removed,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanResult {
    pub branch: String,
    pub path: PathBuf,
    pub outcome: CleanOutcome,
}
