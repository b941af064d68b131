use clap::ArgMatches;
use tracing::{info, warn};

use dux_core::assistants::tmux;
use dux_core::config::load_repo_config_optional;
use dux_core::forge::{ForgeBackend, GhCli};
use dux_core::worktrees::collect_status;

use super::helpers::{repo_root_or_report, report_failure};

pub(crate) fn handle_status_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.status_started", json_output = json_output);

    let root = repo_root_or_report()?;

    let repo_config = match load_repo_config_optional(&root) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load .dux.yml: {e}. Ports will not be shown.");
            warn!(event = "cli.status_config_load_failed", error = %e);
            None
        }
    };

    let gh = GhCli::require().ok().map(|()| GhCli::new(&root));
    if gh.is_none() {
        warn!(event = "cli.status_gh_unavailable");
    }
    let forge = gh.as_ref().map(|g| g as &dyn ForgeBackend);
    let sessions = tmux::list_sessions();

    let rows = collect_status(&root, forge, repo_config.as_ref(), &sessions)
        .map_err(|e| report_failure("Failed to list worktrees", "cli.status_failed", e))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("No worktrees found.");
    } else {
        let formatter = crate::table::TableFormatter::new(&rows);
        formatter.print_table(&rows);
    }

    info!(event = "cli.status_completed", count = rows.len());
    Ok(())
}
