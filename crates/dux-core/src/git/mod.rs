pub mod cli;
pub mod errors;
pub mod handler;
pub mod operations;
pub mod types;

// Re-export commonly used types and functions
pub use errors::GitError;
pub use handler::{
    branch_exists, current_branch, default_branch, is_worktree_dirty, list_worktrees,
    repo_root, repo_root_at,
};
pub use operations::{parse_worktree_list, validate_git_arg, worktree_dir};
pub use types::WorktreeRecord;
