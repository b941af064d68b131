//! Issue-tracker and pull-request integration.
//!
//! The worktree core only consumes `(number, title, body, url)` issue
//! records and optional PR summaries; how they are obtained lives behind
//! [`ForgeBackend`].

pub mod errors;
pub mod github;
pub mod types;

pub use errors::ForgeError;
pub use github::{GhCli, parse_issue_number};
pub use types::{IssueRecord, PrSummary};

/// Operations dux needs from a code-hosting forge.
pub trait ForgeBackend {
    /// Fetch an issue by number.
    fn view_issue(&self, number: u64) -> Result<IssueRecord, ForgeError>;

    /// Open a new issue and return its record.
    fn create_issue(&self, title: &str, body: &str) -> Result<IssueRecord, ForgeError>;

    /// Pull request whose head is `branch`, `None` when there is none or the
    /// lookup fails.
    fn find_pr(&self, branch: &str) -> Option<PrSummary>;

    /// Open a pull request from `head` into `base`.
    fn create_pr(
        &self,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
        draft: bool,
    ) -> Result<PrSummary, ForgeError>;

    /// Open the pull request for `branch` in a browser.
    fn open_pr_in_browser(&self, branch: &str) -> Result<(), ForgeError>;
}
