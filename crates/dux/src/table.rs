use std::path::Path;

use dux_core::WorktreeStatus;

pub struct TableFormatter {
    branch_width: usize,
    state_width: usize,
    pr_width: usize,
    port_width: usize,
    tmux_width: usize,
    path_width: usize,
}

impl TableFormatter {
    pub fn new(rows: &[WorktreeStatus]) -> Self {
        let branch_width = rows
            .iter()
            .map(|r| r.branch.as_deref().unwrap_or("-").chars().count())
            .max()
            .unwrap_or(16)
            .clamp(6, 50); // Between "Branch" header min and reasonable terminal width max
        let path_width = rows
            .iter()
            .map(|r| display_path(&r.path).chars().count())
            .max()
            .unwrap_or(20)
            .clamp(4, 70);

        Self {
            branch_width,
            state_width: 5,
            pr_width: 8,
            port_width: 5,
            tmux_width: 4,
            path_width,
        }
    }

    pub fn print_table(&self, rows: &[WorktreeStatus]) {
        println!("{}", self.border('┌', '┬', '┐'));
        println!(
            "{}",
            self.line(["Branch", "State", "PR", "Port", "Tmux", "Path"])
        );
        println!("{}", self.border('├', '┼', '┤'));
        for row in rows {
            let port = row.port.map_or("-".to_string(), |p| p.to_string());
            println!(
                "{}",
                self.line([
                    row.branch.as_deref().unwrap_or("-"),
                    state_label(row.dirty),
                    row.pr_state.as_deref().unwrap_or("none"),
                    &port,
                    if row.tmux_session { "tmux" } else { "-" },
                    &display_path(&row.path),
                ])
            );
        }
        println!("{}", self.border('└', '┴', '┘'));
    }

    fn widths(&self) -> [usize; 6] {
        [
            self.branch_width,
            self.state_width,
            self.pr_width,
            self.port_width,
            self.tmux_width,
            self.path_width,
        ]
    }

    fn line(&self, cells: [&str; 6]) -> String {
        let body = cells
            .iter()
            .zip(self.widths())
            .map(|(cell, width)| truncate(cell, width))
            .collect::<Vec<_>>()
            .join(" │ ");
        format!("│ {body} │")
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let separator = mid.to_string();
        let body = self
            .widths()
            .iter()
            .map(|w| "─".repeat(w + 2))
            .collect::<Vec<_>>()
            .join(separator.as_str());
        format!("{left}{body}{right}")
    }
}

fn state_label(dirty: Option<bool>) -> &'static str {
    match dirty {
        Some(true) => "dirty",
        Some(false) => "clean",
        None => "?",
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings
/// including emoji and multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        // Safely truncate at character boundaries, not byte boundaries
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
