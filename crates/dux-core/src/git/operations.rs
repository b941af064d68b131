use std::path::{Path, PathBuf};

use crate::config::WORKTREES_DIRNAME;
use crate::git::errors::GitError;
use crate::git::types::WorktreeRecord;

/// Expected on-disk location of the worktree for `branch`.
///
/// Branch separators become nested directories: `issue/12-foo` lives at
/// `<root>/.wt/issue/12-foo`.
pub fn worktree_dir(repo_root: &Path, branch: &str) -> PathBuf {
    repo_root.join(WORKTREES_DIRNAME).join(branch)
}

/// Validate a git argument to prevent injection.
///
/// Rejects values that are empty, start with `-` (option injection), contain
/// control characters, or contain `::` sequences (refspec injection).
pub fn validate_git_arg(value: &str, label: &str) -> Result<(), GitError> {
    let invalid = |message: String| GitError::InvalidArgument {
        label: label.to_string(),
        message,
    };

    if value.is_empty() {
        return Err(invalid("must not be empty".to_string()));
    }
    if value.starts_with('-') {
        return Err(invalid(format!("'{value}' (must not start with '-')")));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(invalid("contains control characters".to_string()));
    }
    if value.contains("::") {
        return Err(invalid("'::' sequences are not allowed".to_string()));
    }
    Ok(())
}

/// Parse `git worktree list --porcelain` output.
///
/// Each block starts with a `worktree <path>` line; a `branch refs/heads/<name>`
/// line inside the block sets the branch. Unrecognized lines (`HEAD`,
/// `detached`, `locked`, `prunable`, ...) are ignored, and a header with an
/// empty path drops that block instead of failing the whole scan.
pub fn parse_worktree_list(output: &str) -> Vec<WorktreeRecord> {
    let mut records = Vec::new();
    let mut current: Option<WorktreeRecord> = None;

    for line in output.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            records.extend(current.take());
            let path = path.trim();
            if !path.is_empty() {
                current = Some(WorktreeRecord::new(PathBuf::from(path), None));
            }
        } else if let Some(branch_ref) = line.strip_prefix("branch ")
            && let Some(record) = current.as_mut()
        {
            let branch_ref = branch_ref.trim();
            let name = branch_ref.strip_prefix("refs/heads/").unwrap_or(branch_ref);
            if !name.is_empty() {
                record.branch = Some(name.to_string());
            }
        }
    }
    records.extend(current);

    records
}

/// Check if a `git push --delete` stderr indicates the branch was already deleted.
///
/// Matches common "branch doesn't exist" patterns across git versions.
pub(crate) fn is_already_deleted_error(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    [
        "remote ref does not exist",
        "unable to delete",
        "does not exist",
    ]
    .iter()
    .any(|pattern| lower.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worktree_dir_nests_branch_segments() {
        let dir = worktree_dir(Path::new("/repo"), "issue/42-fix-login");
        assert_eq!(dir, PathBuf::from("/repo/.wt/issue/42-fix-login"));
    }

    #[test]
    fn test_validate_git_arg_rejects_dash_prefix() {
        let result = validate_git_arg("--evil", "test");
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("must not start with '-'"));
    }

    #[test]
    fn test_validate_git_arg_rejects_control_chars() {
        let msg = validate_git_arg("hello\x00world", "test")
            .unwrap_err()
            .to_string();
        assert!(msg.contains("control characters"));
    }

    #[test]
    fn test_validate_git_arg_rejects_double_colon_and_empty() {
        assert!(validate_git_arg("refs::heads", "test").is_err());
        assert!(validate_git_arg("", "test").is_err());
    }

    #[test]
    fn test_validate_git_arg_accepts_valid_values() {
        assert!(validate_git_arg("origin", "remote").is_ok());
        assert!(validate_git_arg("main", "branch").is_ok());
        assert!(validate_git_arg("work/fix-login-bug-2", "branch").is_ok());
        assert!(validate_git_arg("origin/main", "base").is_ok());
    }

    #[test]
    fn test_parse_worktree_list_blocks() {
        let output = "\
worktree /repo
HEAD 1111111111111111111111111111111111111111
branch refs/heads/main

worktree /repo/.wt/work/foo
HEAD 2222222222222222222222222222222222222222
branch refs/heads/work/foo

worktree /repo/.wt/detached
HEAD 3333333333333333333333333333333333333333
detached
";
        let records = parse_worktree_list(output);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].path, PathBuf::from("/repo"));
        assert_eq!(records[0].branch.as_deref(), Some("main"));
        assert_eq!(records[1].branch.as_deref(), Some("work/foo"));
        assert_eq!(records[2].branch, None);
    }

    #[test]
    fn test_parse_worktree_list_tolerates_malformed_entries() {
        let output = "\
branch refs/heads/orphan
garbage line
worktree 
branch refs/heads/lost
worktree /repo/.wt/ok
branch refs/heads/ok
locked reason here
";
        let records = parse_worktree_list(output);
        assert_eq!(
            records,
            vec![WorktreeRecord::new(
                PathBuf::from("/repo/.wt/ok"),
                Some("ok".to_string())
            )]
        );
    }

    #[test]
    fn test_parse_worktree_list_empty() {
        assert!(parse_worktree_list("").is_empty());
    }

    #[test]
    fn test_is_already_deleted_error() {
        assert!(is_already_deleted_error(
            "error: unable to delete 'work/x': remote ref does not exist"
        ));
        assert!(!is_already_deleted_error("fatal: Authentication failed"));
        assert!(!is_already_deleted_error(""));
    }
}
