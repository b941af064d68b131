//! Identifier derivation: turning issue titles and free-form context into
//! branch-safe, collision-free worktree identifiers.

pub mod handler;
pub mod operations;
pub mod types;

pub use handler::{
    BranchIndex, RepoBranchIndex, derive_context_branch, derive_default_context_branch,
    derive_issue_branch,
};
pub use operations::{FALLBACK_SLUG, slugify};
pub use types::IssueBranch;

/// Branch namespace for worktrees created from free-form context.
pub const CONTEXT_PREFIX: &str = "work";

/// Branch namespace for issue-backed worktrees.
pub const ISSUE_PREFIX: &str = "issue";

/// Titles and contexts are cut to this many words before slugifying.
pub const WORD_LIMIT: usize = 5;
