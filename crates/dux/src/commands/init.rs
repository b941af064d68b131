use clap::ArgMatches;
use tracing::info;

use dux_core::config::{update_gitignore, write_template};

use super::helpers::{repo_root_or_report, report_failure};

pub(crate) fn handle_init_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let force = matches.get_flag("force");
    info!(event = "cli.init_started", force = force);

    let root = repo_root_or_report()?;

    let written = write_template(&root, force)
        .map_err(|e| report_failure("Failed to write config", "cli.init_failed", e))?;
    println!("Wrote {}", written.display());

    match update_gitignore(&root) {
        Ok(Some(path)) => println!("Updated {} to include .wt", path.display()),
        Ok(None) => {}
        Err(e) => return Err(report_failure("Failed to update .gitignore", "cli.init_failed", e)),
    }

    info!(event = "cli.init_completed", path = %written.display());
    Ok(())
}
