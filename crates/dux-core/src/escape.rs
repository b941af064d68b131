//! Shell quoting for command lines handed to a shell or typed into tmux.

/// Quote `s` as a single shell word (POSIX single quotes).
pub fn shell_escape(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\"'\"'"))
}

/// Quote `s` only when it contains characters the shell would interpret.
pub fn shell_word(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | '@' | ',' | '+')
        });
    if plain { s.to_string() } else { shell_escape(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_escape() {
        assert_eq!(shell_escape("hello"), "'hello'");
        assert_eq!(shell_escape("hello world"), "'hello world'");
        assert_eq!(shell_escape("hello'world"), "'hello'\"'\"'world'");
    }

    #[test]
    fn test_shell_escape_handles_metacharacters() {
        assert_eq!(shell_escape("$HOME/dir"), "'$HOME/dir'");
        assert_eq!(shell_escape("dir;rm -rf /"), "'dir;rm -rf /'");
        assert_eq!(shell_escape("$(whoami)"), "'$(whoami)'");
        assert_eq!(shell_escape("`id`"), "'`id`'");
    }

    #[test]
    fn test_shell_word_leaves_plain_words_alone() {
        assert_eq!(shell_word("--dangerously-skip-permissions"), "--dangerously-skip-permissions");
        assert_eq!(shell_word("issue/12-fix-login"), "issue/12-fix-login");
        assert_eq!(shell_word(""), "''");
        assert_eq!(shell_word("two words"), "'two words'");
        assert_eq!(shell_word("line\nbreak"), "'line\nbreak'");
    }
}
