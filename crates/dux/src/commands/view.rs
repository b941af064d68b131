use clap::ArgMatches;
use tracing::{error, info};

use dux_core::forge::{ForgeBackend, GhCli};
use dux_core::git;

use super::helpers::{repo_root_or_report, report_failure};

pub(crate) fn handle_view_command(
    _matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    GhCli::require().map_err(|e| report_failure("Cannot open PR", "cli.view_failed", e))?;
    let root = repo_root_or_report()?;
    let cwd = std::env::current_dir()?;

    let branch = match git::current_branch(&cwd) {
        Ok(Some(branch)) => branch,
        Ok(None) => {
            eprintln!("❌ Unable to determine current branch (detached HEAD?)");
            error!(event = "cli.view_failed", reason = "detached_head");
            return Err("Unable to determine current branch".into());
        }
        Err(e) => {
            return Err(report_failure(
                "Unable to determine current branch",
                "cli.view_failed",
                e,
            ));
        }
    };

    let forge = GhCli::new(&root);
    let Some(pr) = forge.find_pr(&branch) else {
        eprintln!(
            "❌ No GitHub PR found for branch '{branch}'. Create one with 'gh pr create' or 'dux create'."
        );
        error!(event = "cli.view_failed", branch = %branch, reason = "no_pr");
        return Err(format!("No PR for branch '{branch}'").into());
    };

    println!("Opening PR for branch '{branch}' -> {}", pr.url);
    forge
        .open_pr_in_browser(&branch)
        .map_err(|e| report_failure("Failed to open PR", "cli.view_failed", e))?;

    info!(event = "cli.view_completed", branch = %branch, url = %pr.url);
    Ok(())
}
