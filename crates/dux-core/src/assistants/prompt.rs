use std::path::Path;

use crate::forge::IssueRecord;

const WAIT_FOR_INSTRUCTIONS: &str =
    "Please review the context above and wait for explicit instructions before making changes.";

/// Prefix `prompt` with the worktree-scoping preamble.
///
/// Without `auto_start` the assistant is asked to wait for instructions.
pub fn compose_assistant_prompt(
    dir: &Path,
    branch: &str,
    prompt: &str,
    auto_start: bool,
) -> String {
    let dir = dir.display();
    let mut full = format!(
        "IMPORTANT: You are working in a git worktree at: {dir}\n\n\
         This is an isolated working directory for branch: {branch}\n\n\
         DO NOT navigate to parent directories or try to find the \"repo root\".\n\
         ALL your work should be done in the current directory: {dir}\n\n\
         ---\n\n\
         {prompt}"
    );
    if !auto_start {
        full.push_str("\n\n");
        full.push_str(WAIT_FOR_INSTRUCTIONS);
    }
    full
}

pub fn issue_prompt(issue: &IssueRecord, extra_context: &str) -> String {
    let mut prompt = format!(
        "Issue #{}: {}\n\n{}\n\nIssue URL: {}",
        issue.number, issue.title, issue.body, issue.url
    );
    if !extra_context.is_empty() {
        prompt.push_str("\n\nAdditional context from request:\n");
        prompt.push_str(extra_context);
    }
    prompt
}

pub fn context_prompt(context: &str) -> String {
    format!("Task context:\n{context}\n\nThere is no linked GitHub issue for this worktree.")
}
