//! Error types for the launch bridge

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Nothing to launch: empty argument vector")]
    EmptyCommand,

    #[error("No terminal emulator found. Install one of: {0}")]
    NoTerminal(String),

    #[error("Failed to open {path}: exit code {code:?}")]
    OpenFailed { path: PathBuf, code: Option<i32> },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
