//! Reading and rewriting the `PORT=` line of a worktree's env file.
//!
//! Only `PORT=` is touched; every other line is kept verbatim and in order.

use std::fs;
use std::io;
use std::path::Path;

const PORT_PREFIX: &str = "PORT=";

/// Parse a port value, accepting only integers in `1..=65535`.
pub(crate) fn parse_port(value: &str) -> Option<u16> {
    value.trim().parse::<u16>().ok().filter(|p| *p > 0)
}

/// Port from the first `PORT=` line of `env_file`.
///
/// Missing file, missing line, or an invalid value all yield `None`.
pub fn read_env_port(env_file: &Path) -> Option<u16> {
    let content = fs::read_to_string(env_file).ok()?;
    content
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(PORT_PREFIX))
        .and_then(parse_port)
}

/// Rewrite (or append) `PORT=<port>` in `env_file`.
///
/// The first `PORT=` line is replaced in place, any later ones are dropped,
/// and the line is appended when absent. Creates the file if needed.
pub fn ensure_env_port(env_file: &Path, port: u16) -> io::Result<()> {
    let existing = match fs::read_to_string(env_file) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    let port_line = format!("{PORT_PREFIX}{port}");
    let mut lines: Vec<&str> = Vec::new();
    let mut found = false;

    for line in existing.lines() {
        if line.trim_start().starts_with(PORT_PREFIX) {
            if !found {
                lines.push(&port_line);
                found = true;
            }
        } else {
            lines.push(line);
        }
    }
    if !found {
        lines.push(&port_line);
    }

    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(env_file, content)
}
