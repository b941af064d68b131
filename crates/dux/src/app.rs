use clap::{Arg, ArgAction, Command};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("dux")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Issue-centric git worktree manager with GitHub PR automation")
        .long_about("dux gives every GitHub issue or ad-hoc task its own git worktree under .wt/, opens a draft PR for it, and assigns each worktree a stable, collision-free dev-server port derived from its branch name.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("init")
                .about("Create a .dux.yml template in the repo root and ignore .wt")
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help("Overwrite an existing .dux.yml")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("create")
                .about("Create a worktree from context, optionally linked to GitHub issues")
                .arg(
                    Arg::new("context")
                        .help("Short description of the work")
                        .num_args(0..)
                        .index(1)
                )
                .arg(
                    Arg::new("issue")
                        .long("issue")
                        .short('i')
                        .help("Comma-separated GitHub issue number(s) to create worktrees for")
                        .value_delimiter(',')
                        .num_args(1)
                        .action(ArgAction::Append)
                        .conflicts_with("new")
                )
                .arg(
                    Arg::new("new")
                        .long("new")
                        .value_name("TITLE")
                        .help("Create a new GitHub issue with this title and link it")
                )
                .arg(
                    Arg::new("base")
                        .long("base")
                        .short('b')
                        .help("Base branch (default: auto-detected)")
                )
                .arg(
                    Arg::new("ready")
                        .long("ready")
                        .help("Open the PR as ready for review instead of draft")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("code")
                        .long("code")
                        .help("Open the worktree in VS Code")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("claude")
                        .long("claude")
                        .help("Open Claude Code in tmux with the task description")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("codex")
                        .long("codex")
                        .help("Open Codex in tmux with the task description")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("droid")
                        .long("droid")
                        .help("Open Factory Droid in tmux with the task description")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("run")
                        .long("run")
                        .help("Start the dev server after setup")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("no-bootstrap")
                        .long("no-bootstrap")
                        .help("Skip .dux.yml bootstrap steps")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .help("Let the assistant start working immediately")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("status")
                .about("List worktrees with PR state, assigned ports and tmux sessions")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("clean")
                .about("Remove worktrees and branches whose PRs are merged")
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("Remove ALL worktrees, merged or not")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("view")
                .about("Open the current branch's PR in the browser")
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .value_parser(clap::value_parser!(Shell))
                        .index(1)
                )
        )
}
