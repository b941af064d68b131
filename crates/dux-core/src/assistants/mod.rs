//! Launching coding assistants and editors on created worktrees.

pub mod editor;
pub mod errors;
pub mod prompt;
pub mod tmux;
pub mod types;

pub use editor::open_in_code;
pub use errors::AssistantError;
pub use prompt::{compose_assistant_prompt, context_prompt, issue_prompt};
pub use tmux::{
    TmuxWindow, inside_tmux, multi_session_name, plan_windows, session_name_for, window_name,
};
pub use types::{AssistantKind, LaunchTarget};
