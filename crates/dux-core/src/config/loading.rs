//! Parsing of the line-oriented `.dux.yml` repository config.
//!
//! Rules: blank lines and lines starting with `#` are skipped, lines without
//! a `:` are skipped, the key/value split happens on the first `:`, and both
//! sides are trimmed. Unknown keys are ignored so older binaries tolerate
//! newer files.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::REPO_CONFIG_FILENAME;
use crate::config::types::RepoConfig;
use crate::errors::ConfigError;

/// Parse the contents of a `.dux.yml` file.
///
/// # Errors
///
/// Returns `ConfigError::InvalidPort` when `port` is set to something that
/// is not an integer in `1..=65535`. An empty `port:` value means no port.
pub fn parse_repo_config(content: &str) -> Result<RepoConfig, ConfigError> {
    let mut config = RepoConfig::default();

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        let non_empty = (!value.is_empty()).then(|| value.to_string());

        match key {
            "env" => config.env = non_empty,
            "install" => config.install = non_empty,
            "run" => config.run = non_empty,
            "port" => config.port = parse_port_value(value)?,
            other => {
                debug!(event = "core.config.unknown_key_ignored", key = other);
            }
        }
    }

    Ok(config)
}

fn parse_port_value(value: &str) -> Result<Option<u16>, ConfigError> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<u16>() {
        Ok(port) if port > 0 => Ok(Some(port)),
        _ => Err(ConfigError::InvalidPort {
            value: value.to_string(),
        }),
    }
}

/// Load `.dux.yml` from the repository root.
///
/// # Errors
///
/// Returns `ConfigError::ConfigNotFound` if the file does not exist, or
/// any parse error from [`parse_repo_config`].
pub fn load_repo_config(repo_root: &Path) -> Result<RepoConfig, ConfigError> {
    load_repo_config_optional(repo_root)?.ok_or_else(|| ConfigError::ConfigNotFound {
        file: REPO_CONFIG_FILENAME,
        path: repo_root.join(REPO_CONFIG_FILENAME).display().to_string(),
    })
}

/// Load `.dux.yml` if present. A missing file is `Ok(None)`; a present but
/// invalid file is still an error.
pub fn load_repo_config_optional(repo_root: &Path) -> Result<Option<RepoConfig>, ConfigError> {
    let path = repo_root.join(REPO_CONFIG_FILENAME);
    if !path.exists() {
        debug!(event = "core.config.repo_config_missing", path = %path.display());
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let config = parse_repo_config(&content)?;

    info!(
        event = "core.config.repo_config_loaded",
        path = %path.display(),
        has_env = config.env.is_some(),
        has_install = config.install.is_some(),
        has_run = config.run.is_some(),
        port = ?config.port
    );

    Ok(Some(config))
}
