//! # Configuration
//!
//! Two sources feed dux:
//!
//! 1. **Repository config** - `.dux.yml` at the repo root. A minimal
//!    line-oriented `key: value` file (not real YAML) with the keys
//!    `env`, `install`, `run` and `port`.
//! 2. **Tool settings** - environment variables (`DUX_PORT_SPAN`,
//!    `DUX_PORT_PROBE_TIMEOUT_MS`) with validated fallbacks.
//!
//! ```text
//! # .dux.yml
//! env: .env.local
//! install: pnpm install
//! run: pnpm dev
//! port: 3000
//! ```
//!
//! Port allocation only happens when `port` is present.

pub mod defaults;
pub mod loading;
pub mod template;
pub mod types;

pub use loading::{load_repo_config, load_repo_config_optional, parse_repo_config};
pub use template::{update_gitignore, write_template};
pub use types::{Config, RepoConfig};

/// File name of the repository config, relative to the repo root.
pub const REPO_CONFIG_FILENAME: &str = ".dux.yml";

/// Directory (relative to the repo root) holding all worktrees.
pub const WORKTREES_DIRNAME: &str = ".wt";
