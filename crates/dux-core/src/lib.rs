//! dux-core: worktree identity and stateless port allocation.
//!
//! Every unit of work (a GitHub issue or a free-form task) gets its own git
//! worktree under `.wt/`, a collision-free branch name and a TCP port that
//! is derived from the branch and the live state of the machine, never from
//! a registry.
//!
//! # Main Entry Points
//!
//! - [`identity`] - Branch names from issue titles and task text
//! - [`worktrees`] - Locate, create, inspect and clean worktrees
//! - [`ports`] - Deterministic port allocation and recovery
//! - [`bootstrap`] - Apply `.dux.yml` setup to a new worktree
//! - [`config`] - Repository config and tool settings

pub mod assistants;
pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod escape;
pub mod events;
pub mod forge;
pub mod git;
pub mod identity;
pub mod logging;
pub mod ports;
pub mod worktrees;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types at crate root for convenience
pub use assistants::{AssistantError, AssistantKind, LaunchTarget};
pub use bootstrap::{BootstrapError, BootstrapReport, ExternalCommand};
pub use config::{Config, RepoConfig};
pub use errors::{ConfigError, DuxError, DuxResult};
pub use forge::{ForgeBackend, ForgeError, GhCli, IssueRecord, PrSummary};
pub use git::{GitError, WorktreeRecord};
pub use ports::PortError;
pub use worktrees::{
    CleanOutcome, CleanResult, CreateContext, CreateOptions, CreateStatus, WorktreeError,
    WorktreeOutcome, WorktreeStatus,
};

// Re-export handler modules as the primary API
pub use worktrees::create as create_ops;

// Re-export logging initialization
pub use logging::init_logging;
