use std::path::Path;

use clap::ArgMatches;
use tracing::{error, info, warn};

use dux_core::assistants::{self, AssistantKind, LaunchTarget, tmux};
use dux_core::bootstrap::{BootstrapReport, run_dev_server};
use dux_core::config::{Config, RepoConfig, load_repo_config, load_repo_config_optional};
use dux_core::forge::{ForgeBackend, GhCli, IssueRecord, parse_issue_number};
use dux_core::git::{self, cli as git_cli};
use dux_core::worktrees::{create_context_worktree, create_issue_worktree};
use dux_core::{CreateContext, CreateOptions, CreateStatus, WorktreeOutcome, events};

use super::helpers::{repo_root_or_report, report_failure, require_binary};

const DEFAULT_NEW_ISSUE_BODY: &str = "Auto-created for worktree.";

/// What to do once worktrees exist.
struct LaunchPlan {
    code: bool,
    assistants: Vec<AssistantKind>,
    auto_start: bool,
    run_dev_server: bool,
}

pub(crate) fn handle_create_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let context = matches
        .get_many::<String>("context")
        .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
        .trim()
        .to_string();
    let issue_args: Vec<String> = matches
        .get_many::<String>("issue")
        .map(|values| {
            values
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let new_title = matches.get_one::<String>("new").map(|t| t.trim().to_string());
    let no_bootstrap = matches.get_flag("no-bootstrap");

    let plan = LaunchPlan {
        code: matches.get_flag("code"),
        assistants: [
            ("claude", AssistantKind::Claude),
            ("codex", AssistantKind::Codex),
            ("droid", AssistantKind::Droid),
        ]
        .into_iter()
        .filter(|(flag, _)| matches.get_flag(flag))
        .map(|(_, kind)| kind)
        .collect(),
        auto_start: matches.get_flag("start"),
        run_dev_server: matches.get_flag("run"),
    };

    if context.is_empty() && issue_args.is_empty() && new_title.is_none() {
        eprintln!("❌ Context is required for `create` when no issue is specified.");
        error!(event = "cli.create_failed", reason = "missing_context");
        return Err("Context is required when no issue is specified".into());
    }
    if matches.contains_id("issue") && issue_args.is_empty() {
        eprintln!("❌ --issue requires at least one issue number");
        return Err("--issue requires at least one issue number".into());
    }
    let issue_numbers = issue_args
        .iter()
        .map(|arg| parse_issue_number(arg))
        .collect::<Result<Vec<u64>, _>>()
        .map_err(|e| report_failure("Invalid --issue", "cli.create_failed", e))?;

    // Check every collaborator up front so nothing is half-created.
    require_binary("git")?;
    let uses_github = new_title.is_some() || !issue_numbers.is_empty();
    if uses_github {
        GhCli::require()
            .map_err(|e| report_failure("Cannot reach GitHub", "cli.create_failed", e))?;
    }
    if !plan.assistants.is_empty() {
        tmux::require()
            .map_err(|e| report_failure("Cannot open assistant", "cli.create_failed", e))?;
        for assistant in &plan.assistants {
            require_binary(assistant.binary())?;
        }
    }

    let root = repo_root_or_report()?;
    let repo_config = load_config(&root, no_bootstrap)?;

    let base = match matches.get_one::<String>("base") {
        Some(base) => base.clone(),
        None => git::default_branch(&root),
    };
    git::validate_git_arg(&base, "base branch")
        .map_err(|e| report_failure("Invalid base branch", "cli.create_failed", e))?;

    info!(
        event = "cli.create_started",
        base = %base,
        issues = issue_numbers.len(),
        new_issue = new_title.is_some(),
        has_context = !context.is_empty()
    );

    if let Err(e) = git_cli::fetch(&root, "origin", &base) {
        eprintln!("Warning: could not update '{base}' from origin: {e}");
    }
    if let Err(e) = git_cli::prune_worktrees(&root) {
        warn!(event = "cli.create_prune_failed", error = %e);
    }

    let settings = Config::new();
    let options = CreateOptions {
        base_branch: base,
        draft_pr: !matches.get_flag("ready"),
        bootstrap: !no_bootstrap,
    };
    let ctx = CreateContext {
        repo_root: &root,
        repo_config: repo_config.as_ref(),
        settings: &settings,
        options: &options,
    };

    if !uses_github {
        let outcome = create_context_worktree(&ctx, &context)
            .map_err(|e| report_failure("Failed to create worktree", "cli.create_failed", e))?;
        print_single(&outcome);
        open_tools(&[outcome.launch_target()], &plan);
        return finish_single(&outcome, &plan);
    }

    let forge = GhCli::new(&root);

    if let Some(title) = &new_title {
        let body = if context.is_empty() {
            DEFAULT_NEW_ISSUE_BODY
        } else {
            context.as_str()
        };
        let issue = forge
            .create_issue(title, body)
            .map_err(|e| report_failure("Failed to create issue", "cli.create_failed", e))?;
        println!("Created issue #{}: {}", issue.number, issue.url);
        let outcome = create_issue_worktree(&ctx, &forge, &issue, &context)
            .map_err(|e| report_failure("Failed to create worktree", "cli.create_failed", e))?;
        print_single(&outcome);
        open_tools(&[outcome.launch_target()], &plan);
        return finish_single(&outcome, &plan);
    }

    if let [number] = issue_numbers.as_slice() {
        let outcome = fetch_issue(&forge, *number)
            .and_then(|issue| {
                create_issue_worktree(&ctx, &forge, &issue, &context).map_err(|e| e.to_string())
            })
            .map_err(|message| {
                eprintln!("❌ Issue #{number}: {message}");
                error!(event = "cli.create_failed", issue = number, error = %message);
                message
            })?;
        print_single(&outcome);
        open_tools(&[outcome.launch_target()], &plan);
        return finish_single(&outcome, &plan);
    }

    println!("Processing {} issues...", issue_numbers.len());
    let mut ready: Vec<WorktreeOutcome> = Vec::new();
    let mut failures: Vec<(String, String)> = Vec::new();

    for number in &issue_numbers {
        let label = format!("Issue #{number}");
        let result = fetch_issue(&forge, *number).and_then(|issue| {
            create_issue_worktree(&ctx, &forge, &issue, &context).map_err(|e| {
                events::log_app_error(&e);
                e.to_string()
            })
        });
        match result {
            Ok(outcome) => {
                match outcome.status {
                    CreateStatus::Created => println!(
                        "✓ {}: Created worktree at {}",
                        outcome.label,
                        outcome.path.display()
                    ),
                    CreateStatus::Exists => println!(
                        "○ {}: Worktree already exists at {}",
                        outcome.label,
                        outcome.path.display()
                    ),
                }
                ready.push(outcome);
            }
            Err(message) => {
                println!("✗ {label}: Error - {message}");
                error!(event = "cli.create_issue_failed", issue = number, error = %message);
                failures.push((label, message));
            }
        }
    }

    print_summary(&ready, &failures);
    let targets: Vec<LaunchTarget> = ready.iter().map(WorktreeOutcome::launch_target).collect();
    open_tools(&targets, &plan);

    for outcome in &ready {
        print_dev_server_hint(outcome);
    }

    info!(
        event = "cli.create_completed",
        ready = ready.len(),
        failed = failures.len()
    );

    if !failures.is_empty() {
        println!("\nOne or more worktrees failed. See errors above.");
        return Err(format!("{} of {} issues failed", failures.len(), issue_numbers.len()).into());
    }
    Ok(())
}

fn load_config(
    root: &Path,
    no_bootstrap: bool,
) -> Result<Option<RepoConfig>, Box<dyn std::error::Error>> {
    let result = if no_bootstrap {
        load_repo_config_optional(root)
    } else {
        load_repo_config(root).map(Some)
    };
    result.map_err(|e| report_failure("Configuration error", "cli.create_config_failed", e))
}

fn fetch_issue(forge: &GhCli, number: u64) -> Result<IssueRecord, String> {
    forge.view_issue(number).map_err(|e| {
        events::log_app_error(&e);
        e.to_string()
    })
}

fn print_single(outcome: &WorktreeOutcome) {
    match outcome.status {
        CreateStatus::Exists => {
            println!("Worktree already exists at: {}", outcome.path.display());
            println!("   Branch:   {}", outcome.branch);
            if let Some(url) = &outcome.issue_url {
                println!("   Issue:    {url}");
            }
        }
        CreateStatus::Created => {
            println!("✅ Worktree created successfully!");
            println!("   Worktree: {}", outcome.path.display());
            println!("   Branch:   {}", outcome.branch);
            if let Some(url) = &outcome.issue_url {
                println!("   Issue:    {url}");
            }
            if let Some(url) = &outcome.pr_url {
                println!("   PR:       {url}");
            }
            if let Some(port) = outcome.port {
                println!("   Port:     {port}");
            }
            if let Some(report) = &outcome.bootstrap {
                print_bootstrap(report);
            }
        }
    }
    info!(
        event = "cli.create_completed",
        branch = %outcome.branch,
        status = ?outcome.status,
        port = ?outcome.port
    );
}

fn print_bootstrap(report: &BootstrapReport) {
    if let Some(path) = &report.env_copied {
        println!("   env copied -> {}", path.display());
    }
    if let Some(path) = &report.env_missing {
        println!("   warn: env file not found at {}", path.display());
    }
    if let Some(command) = &report.installed {
        println!("   install:  {command}");
    }
}

fn print_summary(ready: &[WorktreeOutcome], failures: &[(String, String)]) {
    println!("\n{}", "=".repeat(60));
    println!("SUMMARY");
    println!("{}", "=".repeat(60));

    let created: Vec<&WorktreeOutcome> = ready
        .iter()
        .filter(|o| o.status == CreateStatus::Created)
        .collect();
    let existing: Vec<&WorktreeOutcome> = ready
        .iter()
        .filter(|o| o.status == CreateStatus::Exists)
        .collect();

    if !created.is_empty() {
        println!("\n✓ Created {} worktree(s):", created.len());
        for outcome in created {
            println!("  {}: {}", outcome.label, outcome.path.display());
            println!("    Branch: {}", outcome.branch);
            if let Some(url) = &outcome.issue_url {
                println!("    Issue:  {url}");
            }
            if let Some(url) = &outcome.pr_url {
                println!("    PR:     {url}");
            }
            if let Some(port) = outcome.port {
                println!("    Port:   {port}");
            }
        }
    }

    if !existing.is_empty() {
        println!("\n○ Already exists ({}):", existing.len());
        for outcome in existing {
            println!("  {}: {}", outcome.label, outcome.path.display());
        }
    }

    if !failures.is_empty() {
        println!("\n✗ Errors ({}):", failures.len());
        for (label, message) in failures {
            println!("  {label}: {message}");
        }
    }
}

/// Open the editor and assistants requested on the command line.
///
/// Tool failures are reported but never undo the created worktrees.
fn open_tools(targets: &[LaunchTarget], plan: &LaunchPlan) {
    if targets.is_empty() {
        return;
    }

    if plan.code {
        for target in targets {
            if !assistants::open_in_code(&target.path) {
                eprintln!("Warning: could not open {} in VS Code", target.path.display());
            }
        }
    }

    for assistant in &plan.assistants {
        if let Err(e) = open_assistant(targets, *assistant, plan.auto_start) {
            eprintln!("❌ Failed to open {assistant}: {e}");
            error!(event = "cli.assistant_open_failed", assistant = %assistant, error = %e);
        }
    }
}

fn open_assistant(
    targets: &[LaunchTarget],
    assistant: AssistantKind,
    auto_start: bool,
) -> Result<(), dux_core::AssistantError> {
    let windows = tmux::plan_windows(targets, assistant, auto_start);

    let session = match targets {
        [single] => {
            let session = tmux::session_name_for(&single.branch);
            println!("Opening {assistant} for {}...", single.branch);
            println!("Creating tmux session: {session}");
            session
        }
        _ => {
            println!("Creating tmux session with {} windows...", windows.len());
            tmux::multi_session_name()
        }
    };

    if let Err(e) = tmux::create_session(&session, &windows) {
        if matches!(e, dux_core::AssistantError::SessionExists { .. }) {
            let quoted = dux_core::escape::shell_escape(&session);
            println!("To attach: tmux attach -t {quoted}");
            println!("To kill:   tmux kill-session -t {quoted}");
        }
        return Err(e);
    }
    if windows.len() > 1 {
        for (idx, window) in windows.iter().enumerate() {
            println!("  Window {}: {}", idx + 1, window.label);
        }
    }

    if tmux::inside_tmux() {
        println!("Switching to tmux session: {session}");
    } else {
        println!("Attaching to tmux session: {session}");
        println!("(Press Ctrl+b, then d to detach)");
        if windows.len() > 1 {
            println!("(Press Ctrl+b, then n/p to navigate windows)");
        }
    }
    tmux::attach_or_switch(&session)
}

fn print_dev_server_hint(outcome: &WorktreeOutcome) {
    let Some(command) = outcome.bootstrap.as_ref().and_then(|r| r.dev_server.as_ref()) else {
        return;
    };
    println!("To start dev server in {}, run: {command}", outcome.path.display());
    if let Some(port) = outcome.port {
        println!("port: {port}");
    }
}

/// Start the dev server in the foreground when asked, otherwise print how to.
fn finish_single(
    outcome: &WorktreeOutcome,
    plan: &LaunchPlan,
) -> Result<(), Box<dyn std::error::Error>> {
    let dev_server = outcome.bootstrap.as_ref().and_then(|r| r.dev_server.as_ref());
    match dev_server {
        Some(command) if plan.run_dev_server && outcome.status == CreateStatus::Created => {
            println!("Starting dev server: {command}");
            if let Some(port) = outcome.port {
                println!("Running on port: {port}");
            }
            run_dev_server(&outcome.path, command, outcome.port).map_err(|e| {
                report_failure("Failed to start dev server", "cli.dev_server_failed", e)
            })?;
        }
        Some(_) => print_dev_server_hint(outcome),
        None => {}
    }
    Ok(())
}
