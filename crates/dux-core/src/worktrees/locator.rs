use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::git::{self, WorktreeRecord};
use crate::identity::IssueBranch;

/// Find the worktree for `branch`, preferring `desired_path`.
///
/// The canonical location wins if it exists on disk. Otherwise the live
/// worktree list is scanned for an entry at `desired_path` or on `branch`
/// whose directory still exists. A failing listing is treated as "not found".
pub fn locate(repo_root: &Path, branch: &str, desired_path: &Path) -> Option<PathBuf> {
    if desired_path.exists() {
        debug!(
            event = "core.worktree.locate_direct_hit",
            branch = branch,
            path = %desired_path.display()
        );
        return Some(desired_path.to_path_buf());
    }

    match git::list_worktrees(repo_root) {
        Ok(records) => find_in_records(&records, branch, desired_path),
        Err(e) => {
            warn!(
                event = "core.worktree.locate_list_failed",
                branch = branch,
                error = %e
            );
            None
        }
    }
}

/// Scan parsed listing entries. Entries without a path or branch are skipped,
/// as are entries whose directory is gone.
pub(crate) fn find_in_records(
    records: &[WorktreeRecord],
    branch: &str,
    desired_path: &Path,
) -> Option<PathBuf> {
    records
        .iter()
        .filter(|r| !r.path.as_os_str().is_empty())
        .filter_map(|r| r.branch.as_deref().map(|b| (r, b)))
        .find(|(r, b)| (r.path == desired_path || *b == branch) && r.path.exists())
        .map(|(r, _)| {
            debug!(
                event = "core.worktree.locate_listing_hit",
                branch = branch,
                path = %r.path.display()
            );
            r.path.clone()
        })
}

/// Locate an issue worktree under its primary branch, then its legacy one.
///
/// Returns the branch that matched along with the worktree path.
pub fn locate_issue_worktree(repo_root: &Path, issue: &IssueBranch) -> Option<(String, PathBuf)> {
    std::iter::once(&issue.primary)
        .chain(issue.legacy.as_ref())
        .find_map(|branch| {
            let desired = git::worktree_dir(repo_root, branch);
            locate(repo_root, branch, &desired).map(|path| (branch.clone(), path))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{commit_file, git_cmd, init_git_repo};
    use std::fs;
    use tempfile::TempDir;

    fn record(path: &Path, branch: Option<&str>) -> WorktreeRecord {
        WorktreeRecord::new(path.to_path_buf(), branch.map(str::to_string))
    }

    #[test]
    fn test_find_by_branch_at_other_path() {
        let dir = TempDir::new().unwrap();
        let elsewhere = dir.path().join("elsewhere");
        fs::create_dir_all(&elsewhere).unwrap();
        let records = vec![
            record(dir.path(), Some("main")),
            record(&elsewhere, Some("work/foo")),
        ];

        let found = find_in_records(&records, "work/foo", &dir.path().join(".wt/work/foo"));
        assert_eq!(found, Some(elsewhere));
    }

    #[test]
    fn test_find_skips_stale_entries() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone");
        let records = vec![record(&gone, Some("work/foo"))];

        assert_eq!(find_in_records(&records, "work/foo", &gone), None);
    }

    #[test]
    fn test_find_skips_partial_entries() {
        let dir = TempDir::new().unwrap();
        let detached = dir.path().join("detached");
        fs::create_dir_all(&detached).unwrap();
        let records = vec![
            record(&detached, None),
            record(Path::new(""), Some("work/foo")),
        ];

        assert_eq!(find_in_records(&records, "work/foo", &detached), None);
    }

    #[test]
    fn test_locate_prefers_existing_desired_path() {
        let dir = TempDir::new().unwrap();
        let desired = dir.path().join(".wt/work/foo");
        fs::create_dir_all(&desired).unwrap();

        // Not a repository: the direct hit must not need the listing.
        assert_eq!(locate(dir.path(), "work/foo", &desired), Some(desired));
    }

    #[test]
    fn test_locate_listing_failure_is_not_found() {
        let dir = TempDir::new().unwrap();
        let desired = dir.path().join(".wt/work/foo");
        assert_eq!(locate(dir.path(), "work/foo", &desired), None);
    }

    #[test]
    fn test_locate_issue_falls_back_to_legacy_branch() {
        let dir = TempDir::new().unwrap();
        init_git_repo(dir.path());
        commit_file(dir.path(), "README.md", "hello", "initial");
        let root = dir.path().canonicalize().unwrap();

        let legacy = "issue/7-make-the-login-page-load-faster-on-mobile";
        let legacy_path = git::worktree_dir(&root, legacy);
        let legacy_str = legacy_path.to_string_lossy().to_string();
        git_cmd(&root, &["worktree", "add", "-b", legacy, &legacy_str]);

        let issue = IssueBranch {
            primary: "issue/7-make-the-login-page-load".to_string(),
            legacy: Some(legacy.to_string()),
        };

        let (branch, path) = locate_issue_worktree(&root, &issue).unwrap();
        assert_eq!(branch, legacy);
        assert_eq!(path, legacy_path);
    }

    #[test]
    fn test_locate_issue_none_when_absent() {
        let dir = TempDir::new().unwrap();
        init_git_repo(dir.path());
        commit_file(dir.path(), "README.md", "hello", "initial");

        let issue = IssueBranch {
            primary: "issue/1-a".to_string(),
            legacy: None,
        };
        assert_eq!(locate_issue_worktree(dir.path(), &issue), None);
    }
}
