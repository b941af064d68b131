use std::path::Path;

/// Per-repository bootstrap configuration read from `.dux.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoConfig {
    /// Path (relative to the repo root) of an env file to copy into new worktrees.
    pub env: Option<String>,
    /// Shell command installing dependencies.
    pub install: Option<String>,
    /// Shell command starting the dev server.
    pub run: Option<String>,
    /// Base port. `None` disables port allocation for the repository.
    pub port: Option<u16>,
}

impl RepoConfig {
    /// The env file key used when recovering ports, empty when unset.
    pub fn env_key(&self) -> &str {
        self.env.as_deref().unwrap_or("")
    }

    /// File name the env file gets inside a worktree (basename of `env`).
    pub fn env_file_name(&self) -> Option<&str> {
        self.env
            .as_deref()
            .and_then(|env| Path::new(env).file_name())
            .and_then(|name| name.to_str())
    }
}

/// Tool-wide settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Hash span; the probe window covers `2 * port_span` candidates.
    pub port_span: u32,
    /// Timeout for the live TCP probe of a candidate port.
    pub probe_timeout_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_file_name_uses_basename() {
        let config = RepoConfig {
            env: Some("config/.env.local".to_string()),
            ..Default::default()
        };
        assert_eq!(config.env_file_name(), Some(".env.local"));
        assert_eq!(config.env_key(), "config/.env.local");
    }

    #[test]
    fn test_env_key_empty_when_unset() {
        let config = RepoConfig::default();
        assert_eq!(config.env_key(), "");
        assert_eq!(config.env_file_name(), None);
    }
}
