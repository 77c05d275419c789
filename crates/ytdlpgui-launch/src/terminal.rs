//! Visible terminal launching per platform

use crate::shell::{self, ShellKind};
use crate::LaunchError;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Terminal emulators tried on Linux/BSD, in order, with the flag that
/// introduces the command to run.
const LINUX_TERMINALS: &[(&str, &str)] = &[
    ("x-terminal-emulator", "-e"),
    ("gnome-terminal", "--"),
    ("konsole", "-e"),
    ("xfce4-terminal", "-x"),
    ("xterm", "-e"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    pub fn shell(&self) -> ShellKind {
        match self {
            Platform::Windows => ShellKind::Cmd,
            Platform::MacOs | Platform::Linux => ShellKind::Posix,
        }
    }
}

/// A concrete process to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Pass `args` to the program verbatim instead of letting the runtime
    /// quote them. Only meaningful for `cmd.exe`.
    pub raw: bool,
}

impl Invocation {
    /// Build the invocation that runs `argv` for `platform`.
    ///
    /// `terminal` names the Linux terminal emulator and is ignored elsewhere.
    pub fn for_platform(
        platform: Platform,
        argv: &[String],
        visible_terminal: bool,
        terminal: Option<(&str, &str)>,
    ) -> Result<Self, LaunchError> {
        let (program, rest) = argv.split_first().ok_or(LaunchError::EmptyCommand)?;

        if !visible_terminal {
            return Ok(Self {
                program: program.clone(),
                args: rest.to_vec(),
                raw: false,
            });
        }

        let rendered = shell::render(argv, platform.shell());
        let invocation = match platform {
            Platform::Windows => Self {
                program: "cmd".to_string(),
                // `start` opens a new console; `/K` keeps it open after yt-dlp exits
                args: vec![
                    "/C".to_string(),
                    "start".to_string(),
                    "\"yt-dlp\"".to_string(),
                    "cmd".to_string(),
                    "/K".to_string(),
                    rendered,
                ],
                raw: true,
            },
            Platform::MacOs => Self {
                program: "osascript".to_string(),
                args: vec![
                    "-e".to_string(),
                    format!(
                        "tell application \"Terminal\" to do script \"{}\"",
                        shell::escape_applescript(&rendered)
                    ),
                    "-e".to_string(),
                    "tell application \"Terminal\" to activate".to_string(),
                ],
                raw: false,
            },
            Platform::Linux => {
                let (terminal, flag) = terminal.ok_or_else(|| {
                    LaunchError::NoTerminal(
                        LINUX_TERMINALS
                            .iter()
                            .map(|(name, _)| *name)
                            .collect::<Vec<_>>()
                            .join(", "),
                    )
                })?;
                Self {
                    program: terminal.to_string(),
                    args: vec![
                        flag.to_string(),
                        "sh".to_string(),
                        "-c".to_string(),
                        format!("{}; exec \"${{SHELL:-sh}}\"", rendered),
                    ],
                    raw: false,
                }
            }
        };
        Ok(invocation)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            if self.raw {
                for arg in &self.args {
                    cmd.raw_arg(arg);
                }
            } else {
                cmd.args(&self.args);
            }
        }
        #[cfg(not(windows))]
        cmd.args(&self.args);
        cmd
    }
}

/// Hands a fully built argument vector to the operating system.
pub trait ProcessLauncher: Send + Sync {
    /// Human-readable command line, quoted for the shell that will run it.
    fn render(&self, argv: &[String]) -> String;

    /// Spawn `argv` without waiting for it. The exit status is never observed.
    fn launch(&self, argv: &[String], visible_terminal: bool) -> Result<(), LaunchError>;
}

/// Launches commands in a new window of the platform's terminal application.
#[derive(Debug, Clone)]
pub struct TerminalLauncher {
    platform: Platform,
}

impl Default for TerminalLauncher {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

impl TerminalLauncher {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    fn detect_terminal(&self) -> Option<(&'static str, &'static str)> {
        if self.platform != Platform::Linux {
            return None;
        }
        LINUX_TERMINALS
            .iter()
            .copied()
            .find(|(name, _)| which::which(name).is_ok())
    }
}

impl ProcessLauncher for TerminalLauncher {
    fn render(&self, argv: &[String]) -> String {
        shell::render(argv, self.platform.shell())
    }

    fn launch(&self, argv: &[String], visible_terminal: bool) -> Result<(), LaunchError> {
        let terminal = if visible_terminal { self.detect_terminal() } else { None };
        let invocation = Invocation::for_platform(self.platform, argv, visible_terminal, terminal)?;

        debug!("Spawning {} {:?}", invocation.program, invocation.args);

        invocation
            .command()
            .stdin(Stdio::null())
            .spawn()?;

        info!("Launched {}", argv[0]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_hidden_invocation_runs_argv_directly() {
        let inv = Invocation::for_platform(Platform::Linux, &argv(&["yt-dlp", "U", "-U"]), false, None)
            .unwrap();
        assert_eq!(inv.program, "yt-dlp");
        assert_eq!(inv.args, argv(&["U", "-U"]));
        assert!(!inv.raw);
    }

    #[test]
    fn test_empty_argv_is_rejected() {
        let err = Invocation::for_platform(Platform::MacOs, &[], true, None).unwrap_err();
        assert!(matches!(err, LaunchError::EmptyCommand));
    }

    #[test]
    fn test_linux_invocation_keeps_window_open() {
        let inv = Invocation::for_platform(
            Platform::Linux,
            &argv(&["yt-dlp", "U", "-P", "/my dir"]),
            true,
            Some(("gnome-terminal", "--")),
        )
        .unwrap();
        assert_eq!(inv.program, "gnome-terminal");
        assert_eq!(inv.args[..3], argv(&["--", "sh", "-c"])[..]);
        assert_eq!(inv.args[3], "yt-dlp U -P '/my dir'; exec \"${SHELL:-sh}\"");
    }

    #[test]
    fn test_linux_without_terminal_fails() {
        let err = Invocation::for_platform(Platform::Linux, &argv(&["yt-dlp"]), true, None).unwrap_err();
        assert!(matches!(err, LaunchError::NoTerminal(_)));
    }

    #[test]
    fn test_macos_invocation_uses_terminal_app() {
        let inv = Invocation::for_platform(
            Platform::MacOs,
            &argv(&["yt-dlp", "-o", "a\"b.%(ext)s"]),
            true,
            None,
        )
        .unwrap();
        assert_eq!(inv.program, "osascript");
        assert_eq!(
            inv.args[1],
            r#"tell application "Terminal" to do script "yt-dlp -o 'a\"b.%(ext)s'""#
        );
    }

    #[test]
    fn test_windows_invocation_is_raw() {
        let inv = Invocation::for_platform(
            Platform::Windows,
            &argv(&["yt-dlp", "U", "-P", "C:\\Users\\me\\My Videos"]),
            true,
            None,
        )
        .unwrap();
        assert_eq!(inv.program, "cmd");
        assert!(inv.raw);
        assert_eq!(inv.args.last().unwrap(), "yt-dlp U -P \"C:\\Users\\me\\My Videos\"");
    }
}
