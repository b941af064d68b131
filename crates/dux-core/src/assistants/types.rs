use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bootstrap::ExternalCommand;

/// Coding assistants dux can start inside a worktree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantKind {
    Claude,
    Codex,
    Droid,
}

impl AssistantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantKind::Claude => "claude",
            AssistantKind::Codex => "codex",
            AssistantKind::Droid => "droid",
        }
    }

    /// Binary that must be on PATH.
    pub fn binary(&self) -> &'static str {
        self.as_str()
    }

    /// Non-interactive-permission invocation with `prompt` as the last argument.
    pub fn command(&self, prompt: &str) -> ExternalCommand {
        let args: &[&str] = match self {
            AssistantKind::Claude => &["--dangerously-skip-permissions"],
            AssistantKind::Codex => &["--dangerously-bypass-approvals-and-sandbox"],
            AssistantKind::Droid => &["exec", "--skip-permissions-unsafe"],
        };
        ExternalCommand::program(
            self.binary(),
            args.iter().copied().chain(std::iter::once(prompt)),
        )
    }

    pub fn is_available(&self) -> bool {
        which::which(self.binary()).is_ok()
    }
}

impl std::fmt::Display for AssistantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ready worktree an assistant should be opened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget {
    pub path: PathBuf,
    pub branch: String,
    /// Human label, e.g. `Issue #12` or the branch name.
    pub label: String,
    /// Task description before the worktree preamble is added.
    pub prompt: String,
}
