use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::git::{self, cli};
use crate::ports::env_file::{parse_port, read_env_port};
use crate::ports::errors::PortError;
use crate::ports::operations::{TcpProbe, allocate_port};
use crate::ports::PORT_CONFIG_KEY;

/// Recover the port recorded for the worktree at `path`.
///
/// Priority: the worktree-scoped git config key, then the `PORT=` line of
/// the env file named after `env_key`'s basename inside the worktree.
/// Invalid values at either step are treated as absent.
pub fn read_worktree_port(path: &Path, env_key: &str) -> Option<u16> {
    match cli::config_get_worktree(path, PORT_CONFIG_KEY) {
        Ok(Some(value)) => {
            if let Some(port) = parse_port(&value) {
                return Some(port);
            }
            debug!(
                event = "core.port.config_value_invalid",
                path = %path.display(),
                value = %value
            );
        }
        Ok(None) => {}
        Err(e) => {
            debug!(
                event = "core.port.config_read_failed",
                path = %path.display(),
                error = %e
            );
        }
    }

    let env_name = Path::new(env_key).file_name()?;
    read_env_port(&path.join(env_name))
}

/// Ports recorded by every live worktree of the repository.
///
/// # Errors
///
/// Returns `PortError::WorktreeListFailed` if the worktree list cannot be read.
pub fn used_ports(repo_root: &Path, env_key: &str) -> Result<HashSet<u16>, PortError> {
    let used: HashSet<u16> = git::list_worktrees(repo_root)?
        .iter()
        .filter_map(|record| read_worktree_port(&record.path, env_key))
        .collect();

    debug!(
        event = "core.port.used_ports_collected",
        repo_root = %repo_root.display(),
        count = used.len()
    );
    Ok(used)
}

/// Persist `port` in the worktree's private git config.
///
/// Best-effort: failures are logged and reported as `false`, never raised.
/// Enables `extensions.worktreeConfig` first so the value is not written to
/// the config shared by all worktrees.
pub fn set_port(worktree_path: &Path, port: u16) -> bool {
    if let Err(e) = cli::enable_worktree_config(worktree_path) {
        warn!(
            event = "core.port.worktree_config_enable_failed",
            path = %worktree_path.display(),
            error = %e
        );
        return false;
    }

    match cli::config_set_worktree(worktree_path, PORT_CONFIG_KEY, &port.to_string()) {
        Ok(()) => {
            info!(
                event = "core.port.persisted",
                path = %worktree_path.display(),
                port = port
            );
            true
        }
        Err(e) => {
            warn!(
                event = "core.port.persist_failed",
                path = %worktree_path.display(),
                port = port,
                error = %e
            );
            false
        }
    }
}

/// Allocate a port for `branch` against the repository's live state.
///
/// The used set and the socket probe are read at different moments; two
/// concurrent invocations may still pick the same port.
pub fn allocate_for_branch(
    repo_root: &Path,
    branch: &str,
    base_port: u16,
    env_key: &str,
    config: &Config,
) -> Result<u16, PortError> {
    let used = used_ports(repo_root, env_key)?;
    let probe = TcpProbe::from_millis(config.probe_timeout_ms);
    allocate_port(branch, base_port, &used, config.port_span, &probe)
}
