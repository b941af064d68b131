use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::bootstrap::command::ExternalCommand;
use crate::bootstrap::errors::BootstrapError;
use crate::config::RepoConfig;
use crate::ports::ensure_env_port;

/// What bootstrapping did to a worktree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Env file written into the worktree.
    pub env_copied: Option<PathBuf>,
    /// Configured env file that did not exist in the repository root.
    pub env_missing: Option<PathBuf>,
    /// Install command that ran successfully.
    pub installed: Option<ExternalCommand>,
    /// Dev server command from config, left for the caller to start or print.
    pub dev_server: Option<ExternalCommand>,
}

/// Apply `.dux.yml` setup to a new worktree.
///
/// Copies the env file (rewriting `PORT=` when a port was allocated) and
/// runs the install command in the worktree. The dev server is not started
/// here; see [`run_dev_server`].
///
/// # Errors
///
/// A failing install command or an unwritable env file aborts bootstrapping.
/// A missing source env file is only reported.
pub fn bootstrap_worktree(
    worktree: &Path,
    repo_root: &Path,
    config: &RepoConfig,
    port: Option<u16>,
) -> Result<BootstrapReport, BootstrapError> {
    let mut report = BootstrapReport::default();

    if let (Some(env), Some(name)) = (config.env.as_deref(), config.env_file_name()) {
        let source = repo_root.join(env);
        let target = worktree.join(name);
        if source.exists() {
            fs::copy(&source, &target).map_err(|e| BootstrapError::EnvCopyFailed {
                from: source.clone(),
                to: target.clone(),
                source: e,
            })?;
            if let Some(port) = port {
                ensure_env_port(&target, port).map_err(|e| BootstrapError::EnvPortWriteFailed {
                    path: target.clone(),
                    source: e,
                })?;
            }
            info!(
                event = "core.bootstrap.env_copied",
                target = %target.display(),
                port = ?port
            );
            report.env_copied = Some(target);
        } else {
            warn!(
                event = "core.bootstrap.env_missing",
                source = %source.display()
            );
            report.env_missing = Some(source);
        }
    }

    if let Some(install) = config.install.as_deref() {
        let command = ExternalCommand::shell(install);
        info!(event = "core.bootstrap.install_started", command = %command);
        let status = command.run_in(worktree, &[])?;
        if !status.success() {
            return Err(BootstrapError::InstallFailed {
                command: command.to_string(),
                code: status.code(),
            });
        }
        info!(event = "core.bootstrap.install_completed", command = %command);
        report.installed = Some(command);
    }

    report.dev_server = config.run.as_deref().map(ExternalCommand::shell);
    Ok(report)
}

/// Run the dev server in the foreground until it exits.
///
/// `PORT` is exported when a port was allocated. A non-zero exit is logged,
/// not raised: an interrupted dev server is the normal way out.
pub fn run_dev_server(
    worktree: &Path,
    command: &ExternalCommand,
    port: Option<u16>,
) -> Result<(), BootstrapError> {
    let envs: Vec<(&str, String)> = port.map(|p| ("PORT", p.to_string())).into_iter().collect();
    info!(
        event = "core.bootstrap.dev_server_started",
        command = %command,
        port = ?port
    );
    let status = command.run_in(worktree, &envs)?;
    info!(
        event = "core.bootstrap.dev_server_exited",
        code = ?status.code()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dirs() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("repo");
        let worktree = temp.path().join("repo/.wt/work/foo");
        fs::create_dir_all(&worktree).unwrap();
        (temp, root, worktree)
    }

    #[test]
    fn test_env_copied_with_port_rewritten() {
        let (_temp, root, worktree) = dirs();
        fs::create_dir_all(root.join("config")).unwrap();
        fs::write(root.join("config/.env.local"), "API=x\nPORT=3000\nDEBUG=1\n").unwrap();
        let config = RepoConfig {
            env: Some("config/.env.local".to_string()),
            ..Default::default()
        };

        let report = bootstrap_worktree(&worktree, &root, &config, Some(3217)).unwrap();

        let target = worktree.join(".env.local");
        assert_eq!(report.env_copied.as_deref(), Some(target.as_path()));
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "API=x\nPORT=3217\nDEBUG=1\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("config/.env.local")).unwrap(),
            "API=x\nPORT=3000\nDEBUG=1\n"
        );
    }

    #[test]
    fn test_env_copied_verbatim_without_port() {
        let (_temp, root, worktree) = dirs();
        fs::write(root.join(".env"), "API=x").unwrap();
        let config = RepoConfig {
            env: Some(".env".to_string()),
            ..Default::default()
        };

        bootstrap_worktree(&worktree, &root, &config, None).unwrap();
        assert_eq!(fs::read_to_string(worktree.join(".env")).unwrap(), "API=x");
    }

    #[test]
    fn test_missing_env_is_reported_not_fatal() {
        let (_temp, root, worktree) = dirs();
        let config = RepoConfig {
            env: Some(".env".to_string()),
            ..Default::default()
        };

        let report = bootstrap_worktree(&worktree, &root, &config, Some(3000)).unwrap();
        assert_eq!(report.env_missing, Some(root.join(".env")));
        assert!(report.env_copied.is_none());
    }

    #[test]
    fn test_install_runs_in_worktree() {
        let (_temp, root, worktree) = dirs();
        let config = RepoConfig {
            install: Some("touch installed.txt".to_string()),
            run: Some("npm run dev".to_string()),
            ..Default::default()
        };

        let report = bootstrap_worktree(&worktree, &root, &config, None).unwrap();
        assert!(worktree.join("installed.txt").exists());
        assert_eq!(report.installed, Some(ExternalCommand::shell("touch installed.txt")));
        assert_eq!(report.dev_server, Some(ExternalCommand::shell("npm run dev")));
    }

    #[test]
    fn test_install_failure_is_fatal() {
        let (_temp, root, worktree) = dirs();
        let config = RepoConfig {
            install: Some("exit 3".to_string()),
            ..Default::default()
        };

        let err = bootstrap_worktree(&worktree, &root, &config, None).unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::InstallFailed { code: Some(3), .. }
        ));
    }

    #[test]
    fn test_run_dev_server_exports_port() {
        let (_temp, _root, worktree) = dirs();
        let command = ExternalCommand::shell("echo \"$PORT\" > port.txt; exit 1");

        run_dev_server(&worktree, &command, Some(3456)).unwrap();
        assert_eq!(
            fs::read_to_string(worktree.join("port.txt")).unwrap(),
            "3456\n"
        );
    }
}
