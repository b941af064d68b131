use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::bootstrap::errors::BootstrapError;
use crate::escape::shell_word;

/// A command dux runs or hands to a shell.
///
/// `Program` is an argv with no shell in between. `Shell` is a line from
/// repository config that explicitly wants shell semantics (pipes, `&&`,
/// variable expansion) and is passed verbatim to `sh -c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalCommand {
    Program { program: String, args: Vec<String> },
    Shell(String),
}

impl ExternalCommand {
    pub fn program<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExternalCommand::Program {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn shell(line: &str) -> Self {
        ExternalCommand::Shell(line.to_string())
    }

    /// Builds the process invocation without spawning it.
    pub fn to_command(&self) -> Command {
        match self {
            ExternalCommand::Program { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
            ExternalCommand::Shell(line) => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(line);
                cmd
            }
        }
    }

    /// One line suitable for typing into an interactive shell.
    ///
    /// Program arguments are quoted individually; shell lines pass through.
    pub fn to_shell_line(&self) -> String {
        match self {
            ExternalCommand::Program { program, args } => std::iter::once(program.as_str())
                .chain(args.iter().map(String::as_str))
                .map(shell_word)
                .collect::<Vec<_>>()
                .join(" "),
            ExternalCommand::Shell(line) => line.clone(),
        }
    }

    /// Run in `dir` with inherited stdio, waiting for exit.
    pub fn run_in(
        &self,
        dir: &Path,
        envs: &[(&str, String)],
    ) -> Result<ExitStatus, BootstrapError> {
        debug!(
            event = "core.bootstrap.command_started",
            command = %self,
            dir = %dir.display()
        );
        let mut cmd = self.to_command();
        cmd.current_dir(dir);
        for (key, value) in envs {
            cmd.env(key, value);
        }
        cmd.status().map_err(|source| BootstrapError::SpawnFailed {
            command: self.to_string(),
            source,
        })
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_shell_line())
    }
}
