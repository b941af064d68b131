//! The create pipeline shared by issue-backed and context worktrees:
//! derive → locate → add → push → initial commit → (PR) → port → bootstrap.

use std::path::Path;

use tracing::{info, warn};

use crate::assistants::{context_prompt, issue_prompt};
use crate::bootstrap::{BootstrapReport, bootstrap_worktree};
use crate::forge::{ForgeBackend, IssueRecord, PrSummary};
use crate::git;
use crate::identity::{RepoBranchIndex, derive_default_context_branch, derive_issue_branch};
use crate::ports::allocate_for_branch;
use crate::worktrees::errors::WorktreeError;
use crate::worktrees::lifecycle;
use crate::worktrees::locator::{locate, locate_issue_worktree};
use crate::worktrees::types::{CreateContext, CreateStatus, WorktreeOutcome};

/// Create (or find) the worktree for `issue`.
///
/// An existing worktree under the primary or legacy branch is returned as
/// `Exists` untouched. Otherwise the branch is created, pushed, given a
/// starting commit and a pull request, then gets its port and bootstrap.
pub fn create_issue_worktree(
    ctx: &CreateContext<'_>,
    forge: &dyn ForgeBackend,
    issue: &IssueRecord,
    extra_context: &str,
) -> Result<WorktreeOutcome, WorktreeError> {
    let derived = derive_issue_branch(issue.number, &issue.title);
    let prompt = issue_prompt(issue, extra_context);
    let label = format!("Issue #{}", issue.number);

    info!(
        event = "core.worktree.create_started",
        issue = issue.number,
        branch = %derived.primary
    );

    if let Some((branch, path)) = locate_issue_worktree(ctx.repo_root, &derived) {
        info!(
            event = "core.worktree.create_exists",
            branch = %branch,
            path = %path.display()
        );
        let mut outcome = WorktreeOutcome::exists(branch, path, label, prompt);
        outcome.issue_url = Some(issue.url.clone());
        return Ok(outcome);
    }

    let branch = derived.primary;
    let path = git::worktree_dir(ctx.repo_root, &branch);
    let message = format!("chore: start {branch} (#{})", issue.number);
    materialize(ctx, &branch, &path, &message)?;

    let pr = find_or_create_pr(ctx, forge, &branch, issue);
    let (port, bootstrap) = finish(ctx, &branch, &path)?;

    info!(
        event = "core.worktree.create_completed",
        branch = %branch,
        port = ?port
    );
    Ok(WorktreeOutcome {
        status: CreateStatus::Created,
        branch,
        path,
        label,
        assistant_prompt: prompt,
        issue_url: Some(issue.url.clone()),
        pr_url: Some(pr.url),
        port,
        bootstrap,
    })
}

/// Create (or find) a `work/<slug>` worktree for free-form `context`.
pub fn create_context_worktree(
    ctx: &CreateContext<'_>,
    context: &str,
) -> Result<WorktreeOutcome, WorktreeError> {
    let branch = derive_default_context_branch(&RepoBranchIndex::new(ctx.repo_root), context);
    let path = git::worktree_dir(ctx.repo_root, &branch);
    let prompt = context_prompt(context);

    info!(event = "core.worktree.create_started", branch = %branch);

    if let Some(existing) = locate(ctx.repo_root, &branch, &path) {
        info!(
            event = "core.worktree.create_exists",
            branch = %branch,
            path = %existing.display()
        );
        return Ok(WorktreeOutcome::exists(branch.clone(), existing, branch, prompt));
    }

    let message = format!("chore: start {branch}");
    materialize(ctx, &branch, &path, &message)?;
    let (port, bootstrap) = finish(ctx, &branch, &path)?;

    info!(
        event = "core.worktree.create_completed",
        branch = %branch,
        port = ?port
    );
    Ok(WorktreeOutcome {
        status: CreateStatus::Created,
        label: branch.clone(),
        branch,
        path,
        assistant_prompt: prompt,
        issue_url: None,
        pr_url: None,
        port,
        bootstrap,
    })
}

fn materialize(
    ctx: &CreateContext<'_>,
    branch: &str,
    path: &Path,
    commit_message: &str,
) -> Result<(), WorktreeError> {
    lifecycle::add_worktree(ctx.repo_root, branch, path, &ctx.options.base_branch)?;
    lifecycle::push_set_upstream(path, branch);
    lifecycle::ensure_initial_commit(path, commit_message);
    Ok(())
}

/// Existing PR for the branch, else a new one. A failed creation falls back
/// to another lookup, then to an "unknown" placeholder.
fn find_or_create_pr(
    ctx: &CreateContext<'_>,
    forge: &dyn ForgeBackend,
    branch: &str,
    issue: &IssueRecord,
) -> PrSummary {
    if let Some(pr) = forge.find_pr(branch) {
        return pr;
    }

    let title = format!("[#{}] {}", issue.number, issue.title);
    let body = format!("Tracking {}\n\nCloses #{}", issue.url, issue.number);
    match forge.create_pr(
        &ctx.options.base_branch,
        branch,
        &title,
        &body,
        ctx.options.draft_pr,
    ) {
        Ok(pr) => pr,
        Err(e) => {
            warn!(
                event = "core.worktree.pr_create_failed",
                branch = branch,
                error = %e
            );
            forge.find_pr(branch).unwrap_or_else(PrSummary::unavailable)
        }
    }
}

/// Allocate and persist a port when the repository configures one, then
/// bootstrap when enabled.
fn finish(
    ctx: &CreateContext<'_>,
    branch: &str,
    path: &Path,
) -> Result<(Option<u16>, Option<BootstrapReport>), WorktreeError> {
    let port = match ctx.repo_config {
        Some(config) => match config.port {
            Some(base_port) => {
                let port = allocate_for_branch(
                    ctx.repo_root,
                    branch,
                    base_port,
                    config.env_key(),
                    ctx.settings,
                )?;
                lifecycle::set_port(path, port);
                Some(port)
            }
            None => None,
        },
        None => None,
    };

    let bootstrap = match ctx.repo_config {
        Some(config) if ctx.options.bootstrap => {
            Some(bootstrap_worktree(path, ctx.repo_root, config, port)?)
        }
        _ => None,
    };

    Ok((port, bootstrap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, RepoConfig};
    use crate::forge::ForgeError;
    use crate::ports::read_worktree_port;
    use crate::test_support::{commit_file, git_cmd, init_git_repo, init_repo_with_origin};
    use crate::worktrees::types::CreateOptions;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeForge {
        existing_pr: Option<PrSummary>,
        fail_create: bool,
        created: RefCell<Vec<(String, String, bool)>>,
    }

    impl ForgeBackend for FakeForge {
        fn view_issue(&self, number: u64) -> Result<IssueRecord, ForgeError> {
            Err(ForgeError::InvalidIssueNumber {
                value: number.to_string(),
            })
        }

        fn create_issue(&self, _title: &str, _body: &str) -> Result<IssueRecord, ForgeError> {
            unreachable!("not used by the create pipeline")
        }

        fn find_pr(&self, _branch: &str) -> Option<PrSummary> {
            self.existing_pr.clone()
        }

        fn create_pr(
            &self,
            _base: &str,
            head: &str,
            title: &str,
            _body: &str,
            draft: bool,
        ) -> Result<PrSummary, ForgeError> {
            if self.fail_create {
                return Err(ForgeError::CommandFailed {
                    command: "pr create".to_string(),
                    stderr: "boom".to_string(),
                });
            }
            self.created
                .borrow_mut()
                .push((head.to_string(), title.to_string(), draft));
            Ok(PrSummary {
                url: format!("https://github.com/o/r/pull/{head}"),
                state: "OPEN".to_string(),
            })
        }

        fn open_pr_in_browser(&self, _branch: &str) -> Result<(), ForgeError> {
            Ok(())
        }
    }

    fn issue(number: u64, title: &str) -> IssueRecord {
        IssueRecord {
            number,
            title: title.to_string(),
            body: "Body".to_string(),
            url: format!("https://github.com/o/r/issues/{number}"),
        }
    }

    fn options() -> CreateOptions {
        CreateOptions {
            base_branch: "main".to_string(),
            draft_pr: true,
            bootstrap: true,
        }
    }

    fn settings() -> Config {
        Config {
            port_span: 500,
            probe_timeout_ms: 50,
        }
    }

    #[test]
    fn test_context_worktree_created_with_port() {
        let dir = TempDir::new().unwrap();
        let root = init_repo_with_origin(dir.path());
        fs::write(root.join(".env"), "PORT=1\nNAME=app\n").unwrap();
        let repo_config = RepoConfig {
            env: Some(".env".to_string()),
            install: Some("touch .installed".to_string()),
            port: Some(3000),
            ..Default::default()
        };
        let (settings, options) = (settings(), options());
        let ctx = CreateContext {
            repo_root: &root,
            repo_config: Some(&repo_config),
            settings: &settings,
            options: &options,
        };

        let outcome =
            create_context_worktree(&ctx, "Add dark mode to settings page now please").unwrap();

        assert_eq!(outcome.status, CreateStatus::Created);
        assert_eq!(outcome.branch, "work/add-dark-mode-to-settings");
        assert_eq!(outcome.label, "work/add-dark-mode-to-settings");
        assert_eq!(outcome.path, root.join(".wt/work/add-dark-mode-to-settings"));
        let port = outcome.port.unwrap();
        assert!((3000..=3999).contains(&port));
        assert_eq!(read_worktree_port(&outcome.path, ".env"), Some(port));
        assert_eq!(
            fs::read_to_string(outcome.path.join(".env")).unwrap(),
            format!("PORT={port}\nNAME=app\n")
        );
        assert!(outcome.path.join(".installed").exists());
        assert_eq!(
            git_cmd(&outcome.path, &["log", "-1", "--format=%s"]),
            "chore: start work/add-dark-mode-to-settings"
        );
    }

    #[test]
    fn test_repeated_context_gets_suffixed_branch() {
        let dir = TempDir::new().unwrap();
        let root = init_repo_with_origin(dir.path());
        let (settings, options) = (settings(), options());
        let ctx = CreateContext {
            repo_root: &root,
            repo_config: None,
            settings: &settings,
            options: &options,
        };

        let first = create_context_worktree(&ctx, "fix flaky test").unwrap();
        let second = create_context_worktree(&ctx, "fix flaky test").unwrap();

        assert_eq!(first.branch, "work/fix-flaky-test");
        assert_eq!(second.branch, "work/fix-flaky-test-2");
        assert_eq!(first.port, None);
        assert!(first.bootstrap.is_none());
    }

    #[test]
    fn test_context_worktree_survives_push_and_commit_failures() {
        // No origin remote: push and the initial commit both fail.
        let dir = TempDir::new().unwrap();
        init_git_repo(dir.path());
        commit_file(dir.path(), "README.md", "hello", "initial");
        git_cmd(dir.path(), &["update-ref", "refs/remotes/origin/main", "HEAD"]);
        let root = dir.path().canonicalize().unwrap();
        let head = git_cmd(&root, &["rev-parse", "HEAD"]);

        let repo_config = RepoConfig {
            port: Some(3000),
            ..Default::default()
        };
        let (settings, options) = (settings(), options());
        let ctx = CreateContext {
            repo_root: &root,
            repo_config: Some(&repo_config),
            settings: &settings,
            options: &options,
        };

        let outcome = create_context_worktree(&ctx, "offline work").unwrap();

        assert_eq!(outcome.status, CreateStatus::Created);
        assert_eq!(outcome.branch, "work/offline-work");
        assert!(outcome.path.exists());
        assert_eq!(git_cmd(&outcome.path, &["rev-parse", "HEAD"]), head);
        let port = outcome.port.unwrap();
        assert_eq!(read_worktree_port(&outcome.path, ""), Some(port));
    }

    #[test]
    fn test_sibling_worktrees_get_distinct_ports() {
        let dir = TempDir::new().unwrap();
        let root = init_repo_with_origin(dir.path());
        let repo_config = RepoConfig {
            port: Some(3000),
            ..Default::default()
        };
        let settings = settings();
        let options = CreateOptions {
            bootstrap: false,
            ..options()
        };
        let ctx = CreateContext {
            repo_root: &root,
            repo_config: Some(&repo_config),
            settings: &settings,
            options: &options,
        };

        let ports: Vec<u16> = ["A", "B", "C"]
            .iter()
            .map(|c| create_context_worktree(&ctx, c).unwrap().port.unwrap())
            .collect();

        assert_ne!(ports[0], ports[1]);
        assert_ne!(ports[1], ports[2]);
        assert_ne!(ports[0], ports[2]);
        assert!(ports.iter().all(|p| (3000..=3999).contains(p)));
    }

    #[test]
    fn test_issue_worktree_created_with_draft_pr() {
        let dir = TempDir::new().unwrap();
        let root = init_repo_with_origin(dir.path());
        let (settings, options) = (settings(), options());
        let ctx = CreateContext {
            repo_root: &root,
            repo_config: None,
            settings: &settings,
            options: &options,
        };
        let forge = FakeForge::default();

        let outcome =
            create_issue_worktree(&ctx, &forge, &issue(12, "Fix Login Bug!!"), "").unwrap();

        assert_eq!(outcome.status, CreateStatus::Created);
        assert_eq!(outcome.branch, "issue/12-fix-login-bug");
        assert_eq!(outcome.label, "Issue #12");
        assert_eq!(
            outcome.pr_url.as_deref(),
            Some("https://github.com/o/r/pull/issue/12-fix-login-bug")
        );
        assert_eq!(
            forge.created.borrow().as_slice(),
            &[(
                "issue/12-fix-login-bug".to_string(),
                "[#12] Fix Login Bug!!".to_string(),
                true
            )]
        );
        assert_eq!(
            git_cmd(&outcome.path, &["log", "-1", "--format=%s"]),
            "chore: start issue/12-fix-login-bug (#12)"
        );
    }

    #[test]
    fn test_issue_worktree_reuses_existing_pr() {
        let dir = TempDir::new().unwrap();
        let root = init_repo_with_origin(dir.path());
        let (settings, options) = (settings(), options());
        let ctx = CreateContext {
            repo_root: &root,
            repo_config: None,
            settings: &settings,
            options: &options,
        };
        let forge = FakeForge {
            existing_pr: Some(PrSummary {
                url: "https://github.com/o/r/pull/9".to_string(),
                state: "OPEN".to_string(),
            }),
            ..Default::default()
        };

        let outcome = create_issue_worktree(&ctx, &forge, &issue(3, "Docs"), "").unwrap();
        assert_eq!(outcome.pr_url.as_deref(), Some("https://github.com/o/r/pull/9"));
        assert!(forge.created.borrow().is_empty());
    }

    #[test]
    fn test_issue_pr_failure_falls_back_to_placeholder() {
        let dir = TempDir::new().unwrap();
        let root = init_repo_with_origin(dir.path());
        let (settings, options) = (settings(), options());
        let ctx = CreateContext {
            repo_root: &root,
            repo_config: None,
            settings: &settings,
            options: &options,
        };
        let forge = FakeForge {
            fail_create: true,
            ..Default::default()
        };

        let outcome = create_issue_worktree(&ctx, &forge, &issue(4, "Flaky"), "").unwrap();
        assert_eq!(outcome.status, CreateStatus::Created);
        assert_eq!(outcome.pr_url.as_deref(), Some("N/A"));
    }

    #[test]
    fn test_issue_worktree_second_request_is_exists() {
        let dir = TempDir::new().unwrap();
        let root = init_repo_with_origin(dir.path());
        let (settings, options) = (settings(), options());
        let ctx = CreateContext {
            repo_root: &root,
            repo_config: None,
            settings: &settings,
            options: &options,
        };
        let forge = FakeForge::default();
        let record = issue(5, "Speed up the build");

        let first = create_issue_worktree(&ctx, &forge, &record, "").unwrap();
        let second = create_issue_worktree(&ctx, &forge, &record, "more").unwrap();

        assert_eq!(second.status, CreateStatus::Exists);
        assert_eq!(second.path, first.path);
        assert_eq!(second.issue_url, Some(record.url.clone()));
        assert!(second.assistant_prompt.ends_with("Additional context from request:\nmore"));
        assert_eq!(forge.created.borrow().len(), 1);
    }

    #[test]
    fn test_install_failure_surfaces_as_error() {
        let dir = TempDir::new().unwrap();
        let root = init_repo_with_origin(dir.path());
        let repo_config = RepoConfig {
            install: Some("exit 2".to_string()),
            ..Default::default()
        };
        let (settings, options) = (settings(), options());
        let ctx = CreateContext {
            repo_root: &root,
            repo_config: Some(&repo_config),
            settings: &settings,
            options: &options,
        };

        let result = create_context_worktree(&ctx, "broken install");
        assert!(matches!(result, Err(WorktreeError::BootstrapError { .. })));
        // The worktree itself survives the failed bootstrap.
        assert!(root.join(".wt/work/broken-install").exists());
    }
}
