//! Worktree lifecycle: locating, creating, inspecting and cleaning the
//! `.wt/` working copies bound to units of work.

pub mod clean;
pub mod create;
pub mod errors;
pub mod lifecycle;
pub mod locator;
pub mod status;
pub mod types;

pub use clean::clean_worktrees;
pub use create::{create_context_worktree, create_issue_worktree};
pub use errors::WorktreeError;
pub use locator::{locate, locate_issue_worktree};
pub use status::collect_status;
pub use types::{
    CleanOutcome, CleanResult, CreateContext, CreateOptions, CreateStatus, WorktreeOutcome,
    WorktreeStatus,
};
