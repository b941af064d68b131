//! Stateless port allocation.
//!
//! Every branch hashes to a deterministic home port inside
//! `[base, base + span)`. Allocation probes forward from there, skipping
//! ports recorded by sibling worktrees and ports something is actually
//! listening on. Nothing is persisted beyond the worktree's own config:
//! the used set is rebuilt from the live worktree list on every call.

pub mod env_file;
pub mod errors;
pub mod handler;
pub mod operations;

pub use env_file::{ensure_env_port, read_env_port};
pub use errors::PortError;
pub use handler::{allocate_for_branch, read_worktree_port, set_port, used_ports};
pub use operations::{PortProbe, TcpProbe, allocate_port, stable_hash, starting_port};

/// Key under which the allocated port is stored in the worktree-scoped git config.
pub const PORT_CONFIG_KEY: &str = "dux.port";
