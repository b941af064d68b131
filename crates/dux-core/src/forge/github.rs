//! GitHub backend driven through the `gh` CLI.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, info, warn};

use super::ForgeBackend;
use super::errors::ForgeError;
use super::types::{IssueRecord, PrSummary};

const ISSUE_FIELDS: &str = "number,title,url,body";
const PR_FIELDS: &str = "url,state";

/// `gh` invoked from a fixed working directory.
pub struct GhCli {
    workdir: PathBuf,
}

impl GhCli {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }

    /// Fails fast when `gh` is not on PATH.
    pub fn require() -> Result<(), ForgeError> {
        which::which("gh")
            .map(|_| ())
            .map_err(|_| ForgeError::NotInstalled { binary: "gh" })
    }

    fn output(&self, args: &[&str]) -> Result<Output, ForgeError> {
        Command::new("gh")
            .current_dir(&self.workdir)
            .args(args)
            .output()
            .map_err(|source| ForgeError::SpawnFailed { source })
    }

    fn run(&self, args: &[&str]) -> Result<String, ForgeError> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(ForgeError::CommandFailed {
                command: args.iter().take(2).copied().collect::<Vec<_>>().join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn view_pr(&self, branch: &str) -> Result<PrSummary, ForgeError> {
        let json = self.run(&["pr", "view", branch, "--json", PR_FIELDS])?;
        parse_json(&json, "pr view")
    }
}

impl ForgeBackend for GhCli {
    fn view_issue(&self, number: u64) -> Result<IssueRecord, ForgeError> {
        debug!(event = "core.forge.issue_view_started", number = number);
        let number_arg = number.to_string();
        let json = self.run(&["issue", "view", &number_arg, "--json", ISSUE_FIELDS])?;
        let issue: IssueRecord = parse_json(&json, "issue view")?;
        debug!(
            event = "core.forge.issue_view_completed",
            number = issue.number,
            title = %issue.title
        );
        Ok(issue)
    }

    fn create_issue(&self, title: &str, body: &str) -> Result<IssueRecord, ForgeError> {
        info!(event = "core.forge.issue_create_started", title = title);
        let stdout = self.run(&["issue", "create", "--title", title, "--body", body])?;
        let number = issue_number_from_url(&stdout).ok_or_else(|| ForgeError::ParseFailed {
            command: "issue create".to_string(),
            message: format!("no issue URL in output '{stdout}'"),
        })?;
        info!(event = "core.forge.issue_create_completed", number = number);
        self.view_issue(number)
    }

    fn find_pr(&self, branch: &str) -> Option<PrSummary> {
        match self.view_pr(branch) {
            Ok(pr) => {
                debug!(
                    event = "core.forge.pr_lookup_completed",
                    branch = branch,
                    state = %pr.state
                );
                Some(pr)
            }
            Err(e) => {
                debug!(
                    event = "core.forge.pr_lookup_no_pr",
                    branch = branch,
                    error = %e
                );
                None
            }
        }
    }

    fn create_pr(
        &self,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
        draft: bool,
    ) -> Result<PrSummary, ForgeError> {
        info!(
            event = "core.forge.pr_create_started",
            base = base,
            head = head,
            draft = draft
        );
        let mut args = vec![
            "pr", "create", "--base", base, "--head", head, "--title", title, "--body", body,
        ];
        if draft {
            args.push("--draft");
        }
        let stdout = self.run(&args)?;

        // `gh pr create` prints the URL; state comes from a follow-up view.
        match self.view_pr(head) {
            Ok(pr) => {
                info!(event = "core.forge.pr_create_completed", url = %pr.url);
                Ok(pr)
            }
            Err(e) => {
                warn!(
                    event = "core.forge.pr_view_after_create_failed",
                    head = head,
                    error = %e
                );
                Ok(PrSummary {
                    url: last_url(&stdout).unwrap_or(stdout.as_str()).to_string(),
                    state: if draft { "DRAFT" } else { "OPEN" }.to_string(),
                })
            }
        }
    }

    fn open_pr_in_browser(&self, branch: &str) -> Result<(), ForgeError> {
        info!(event = "core.forge.pr_open_web_started", branch = branch);
        self.run(&["pr", "view", branch, "--web"])?;
        Ok(())
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str, command: &str) -> Result<T, ForgeError> {
    serde_json::from_str(json).map_err(|e| ForgeError::ParseFailed {
        command: command.to_string(),
        message: e.to_string(),
    })
}

fn last_url(output: &str) -> Option<&str> {
    output
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with("https://") || line.starts_with("http://"))
}

/// Extracts `<n>` from `.../issues/<n>` in `gh issue create` output.
pub(crate) fn issue_number_from_url(output: &str) -> Option<u64> {
    let url = last_url(output)?;
    let (_, tail) = url.trim_end_matches('/').rsplit_once("/issues/")?;
    tail.parse().ok()
}

/// Parses a user-supplied issue number such as `42` or `#42`.
pub fn parse_issue_number(value: &str) -> Result<u64, ForgeError> {
    value
        .trim()
        .trim_start_matches('#')
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ForgeError::InvalidIssueNumber {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_number_from_create_output() {
        let output = "Creating issue in owner/repo\n\nhttps://github.com/owner/repo/issues/87\n";
        assert_eq!(issue_number_from_url(output), Some(87));
    }

    #[test]
    fn test_issue_number_from_output_without_url() {
        assert_eq!(issue_number_from_url("something went sideways"), None);
        assert_eq!(
            issue_number_from_url("https://github.com/owner/repo/pull/3"),
            None
        );
    }

    #[test]
    fn test_parse_issue_number() {
        assert_eq!(parse_issue_number("42").unwrap(), 42);
        assert_eq!(parse_issue_number("#7").unwrap(), 7);
        assert!(matches!(
            parse_issue_number("abc"),
            Err(ForgeError::InvalidIssueNumber { .. })
        ));
        assert!(parse_issue_number("0").is_err());
    }

    #[test]
    fn test_parse_issue_json() {
        let issue: IssueRecord = parse_json(
            r#"{"number":5,"title":"Add dark mode","url":"https://github.com/o/r/issues/5","body":"Please"}"#,
            "issue view",
        )
        .unwrap();
        assert_eq!(issue.title, "Add dark mode");
        assert_eq!(issue.body, "Please");
    }

    #[test]
    fn test_parse_json_reports_command() {
        let err = parse_json::<PrSummary>("not json", "pr view").unwrap_err();
        assert!(err.to_string().contains("pr view"));
    }
}
