use clap::ArgMatches;
use tracing::info;

use dux_core::CleanOutcome;
use dux_core::forge::GhCli;
use dux_core::worktrees::clean_worktrees;

use super::helpers::{repo_root_or_report, report_failure};

pub(crate) fn handle_clean_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let all = matches.get_flag("all");
    info!(event = "cli.clean_started", all = all);

    if !all {
        GhCli::require()
            .map_err(|e| report_failure("Cannot check PR state", "cli.clean_failed", e))?;
    }
    let root = repo_root_or_report()?;
    let forge = GhCli::new(&root);

    let results = clean_worktrees(&root, &forge, all)
        .map_err(|e| report_failure("Failed to clean worktrees", "cli.clean_failed", e))?;

    if results.is_empty() {
        println!("Nothing to clean.");
    }
    let mut failed = 0usize;
    for result in &results {
        match &result.outcome {
            CleanOutcome::Removed if all => println!("Removed {}", result.branch),
            CleanOutcome::Removed => println!("Pruned {} (merged)", result.branch),
            CleanOutcome::Failed(message) => {
                failed += 1;
                eprintln!("❌ Error removing {}: {}", result.branch, message);
            }
        }
    }

    info!(
        event = "cli.clean_completed",
        removed = results.len() - failed,
        failed = failed
    );

    if failed > 0 {
        return Err(format!("{failed} worktree(s) could not be removed").into());
    }
    Ok(())
}
