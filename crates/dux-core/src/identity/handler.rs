use std::path::Path;

use tracing::{debug, info};

use crate::git;
use crate::identity::operations::{first_words, slugify};
use crate::identity::types::IssueBranch;
use crate::identity::{CONTEXT_PREFIX, ISSUE_PREFIX, WORD_LIMIT};

/// Existence checks consulted while resolving identifier collisions.
pub trait BranchIndex {
    /// Whether a branch with this name already exists.
    fn branch_exists(&self, branch: &str) -> bool;

    /// Whether the worktree directory for this branch already exists on disk.
    fn worktree_dir_exists(&self, branch: &str) -> bool;
}

/// [`BranchIndex`] backed by a real repository and its `.wt/` directory.
pub struct RepoBranchIndex<'a> {
    repo_root: &'a Path,
}

impl<'a> RepoBranchIndex<'a> {
    pub fn new(repo_root: &'a Path) -> Self {
        Self { repo_root }
    }
}

impl BranchIndex for RepoBranchIndex<'_> {
    fn branch_exists(&self, branch: &str) -> bool {
        git::branch_exists(self.repo_root, branch)
    }

    fn worktree_dir_exists(&self, branch: &str) -> bool {
        git::worktree_dir(self.repo_root, branch).exists()
    }
}

/// Derive a unique `<prefix>/<slug>` branch from free-form context.
///
/// Probes `candidate`, `candidate-2`, `candidate-3`, ... until neither a
/// branch nor a worktree directory of that name exists. Both checks matter:
/// a lingering branch whose worktree was deleted, or a directory whose
/// branch was deleted, must not be reused.
pub fn derive_context_branch(index: &dyn BranchIndex, context: &str, prefix: &str) -> String {
    let slug = slugify(&first_words(context, WORD_LIMIT));
    let base = format!("{prefix}/{slug}");

    let is_taken = |name: &str| index.branch_exists(name) || index.worktree_dir_exists(name);

    let mut candidate = base.clone();
    let mut suffix = 2u32;
    while is_taken(&candidate) {
        debug!(event = "core.identity.candidate_taken", candidate = %candidate);
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }

    info!(
        event = "core.identity.context_branch_derived",
        branch = %candidate,
        attempts = suffix - 1
    );
    candidate
}

/// Convenience wrapper using the default `work/` namespace.
pub fn derive_default_context_branch(index: &dyn BranchIndex, context: &str) -> String {
    derive_context_branch(index, context, CONTEXT_PREFIX)
}

/// Branch names for an issue: the truncated primary form plus the legacy
/// full-title form when the two differ.
pub fn derive_issue_branch(number: u64, title: &str) -> IssueBranch {
    let limited = first_words(title, WORD_LIMIT);
    let full_slug = slugify(title);
    let branch_slug = if limited.is_empty() {
        full_slug.clone()
    } else {
        slugify(&limited)
    };

    let primary = format!("{ISSUE_PREFIX}/{number}-{branch_slug}");
    let legacy = (full_slug != branch_slug).then(|| format!("{ISSUE_PREFIX}/{number}-{full_slug}"));

    IssueBranch { primary, legacy }
}
