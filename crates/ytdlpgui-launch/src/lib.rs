//! Launch bridge for ytdlpgui
//!
//! Everything that leaves the process goes through here:
//! - a visible terminal window running the downloader
//! - the desktop file manager and text editor

mod desktop;
mod error;
pub mod shell;
mod terminal;

pub use desktop::{open_folder, open_in_editor};
pub use error::LaunchError;
pub use shell::ShellKind;
pub use terminal::{Invocation, Platform, ProcessLauncher, TerminalLauncher};
