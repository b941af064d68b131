//! `dux init` support: the commented config template and `.gitignore` upkeep.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{REPO_CONFIG_FILENAME, WORKTREES_DIRNAME};
use crate::errors::ConfigError;

const TEMPLATE: &str = "# .dux.yml
# Repo-local bootstrap configuration for worktrees.
# All fields are optional. Uncomment and configure as needed.

# Path to environment file to copy into worktrees
# env: .env.local

# Command to install dependencies
# install: pnpm install

# Command to run dev server
# run: pnpm dev

# Base port for automatic port allocation
# port: 3000
";

/// Write the template `.dux.yml` into `repo_root`.
///
/// # Errors
///
/// Returns `ConfigError::AlreadyExists` if the file exists and `force` is false.
pub fn write_template(repo_root: &Path, force: bool) -> Result<PathBuf, ConfigError> {
    let path = repo_root.join(REPO_CONFIG_FILENAME);
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.display().to_string(),
        });
    }

    fs::write(&path, TEMPLATE)?;
    info!(event = "core.config.template_written", path = %path.display(), force = force);
    Ok(path)
}

/// Append `.wt` to an existing `.gitignore`.
///
/// Returns the path when the file was modified; `None` when there is no
/// `.gitignore` or it already ignores the worktree directory.
pub fn update_gitignore(repo_root: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let path = repo_root.join(".gitignore");
    if !path.exists() {
        return Ok(None);
    }

    let mut content = fs::read_to_string(&path)?;
    let rooted = format!("/{WORKTREES_DIRNAME}");
    let already_ignored = content
        .lines()
        .map(str::trim)
        .any(|line| line == WORKTREES_DIRNAME || line == rooted);
    if already_ignored {
        return Ok(None);
    }

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(WORKTREES_DIRNAME);
    content.push('\n');
    fs::write(&path, content)?;

    info!(event = "core.config.gitignore_updated", path = %path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_repo_config;
    use tempfile::TempDir;

    #[test]
    fn test_template_parses_to_empty_config() {
        let config = parse_repo_config(TEMPLATE).unwrap();
        assert_eq!(config, Default::default());
    }

    #[test]
    fn test_write_template_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        write_template(dir.path(), false).unwrap();
        let second = write_template(dir.path(), false);
        assert!(matches!(second, Err(ConfigError::AlreadyExists { .. })));
        assert!(write_template(dir.path(), true).is_ok());
    }

    #[test]
    fn test_update_gitignore_appends_once() {
        let dir = TempDir::new().unwrap();
        let gitignore = dir.path().join(".gitignore");
        fs::write(&gitignore, "target").unwrap();

        assert!(update_gitignore(dir.path()).unwrap().is_some());
        assert_eq!(fs::read_to_string(&gitignore).unwrap(), "target\n.wt\n");

        assert!(update_gitignore(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_update_gitignore_respects_rooted_entry() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "/.wt\n").unwrap();
        assert!(update_gitignore(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_update_gitignore_without_file() {
        let dir = TempDir::new().unwrap();
        assert!(update_gitignore(dir.path()).unwrap().is_none());
        assert!(!dir.path().join(".gitignore").exists());
    }
}
