//! Shell-safe rendering of argument vectors

/// Quoting rules of the shell that will eventually parse a rendered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    /// sh / bash / zsh
    Posix,
    /// Windows `cmd.exe`
    Cmd,
}

impl ShellKind {
    pub fn current() -> Self {
        if cfg!(windows) {
            ShellKind::Cmd
        } else {
            ShellKind::Posix
        }
    }
}

/// Render `argv` as a single command line for `shell`.
pub fn render(argv: &[String], shell: ShellKind) -> String {
    match shell {
        ShellKind::Posix => shell_words::join(argv),
        ShellKind::Cmd => argv.iter().map(|arg| quote_cmd(arg)).collect::<Vec<_>>().join(" "),
    }
}

/// Single-quote `arg` unless every character is safe bare.
pub fn quote_posix(arg: &str) -> String {
    shell_words::quote(arg).into_owned()
}

/// Double-quote `arg` for `cmd.exe`, doubling embedded quotes.
///
/// `%` is left alone: yt-dlp output templates use `%(title)s`, which cmd only
/// expands when the name between percent signs is a defined variable.
pub fn quote_cmd(arg: &str) -> String {
    if arg.is_empty() {
        return "\"\"".to_string();
    }
    let needs_quotes = arg
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '&' | '|' | '<' | '>' | '^' | '(' | ')' | '[' | ']' | '#' | '+' | ','));
    if !needs_quotes {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\"\""))
}

/// Escape a command for embedding inside an AppleScript string literal.
pub fn escape_applescript(command: &str) -> String {
    command.replace('\\', "\\\\").replace('"', "\\\"")
}
