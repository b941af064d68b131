//! Repository-specific setup applied to freshly created worktrees.
//!
//! Commands from `.dux.yml` are carried as [`ExternalCommand`] values so the
//! quoting of each one is explicit.

pub mod command;
pub mod errors;
pub mod handler;

pub use command::ExternalCommand;
pub use errors::BootstrapError;
pub use handler::{BootstrapReport, bootstrap_worktree, run_dev_server};
