use clap::ArgMatches;
use clap_complete::Shell;
use tracing::{error, info};

use dux_core::events;

pub mod helpers;

mod clean;
mod create;
mod init;
mod status;
mod view;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("init", sub_matches)) => init::handle_init_command(sub_matches),
        Some(("create", sub_matches)) => create::handle_create_command(sub_matches),
        Some(("status", sub_matches)) => status::handle_status_command(sub_matches),
        Some(("clean", sub_matches)) => clean::handle_clean_command(sub_matches),
        Some(("view", sub_matches)) => view::handle_view_command(sub_matches),
        Some(("completions", sub_matches)) => print_completions(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// Write the completion script for the requested shell to stdout.
fn print_completions(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let shell = *matches
        .get_one::<Shell>("shell")
        .ok_or("Shell argument is required")?;
    info!(event = "cli.completions_generated", shell = %shell);

    let mut cli = crate::app::build_cli();
    let bin_name = cli.get_name().to_string();
    clap_complete::generate(shell, &mut cli, bin_name, &mut std::io::stdout());
    Ok(())
}
