//! Opening files and folders with the desktop environment

use crate::terminal::Platform;
use crate::LaunchError;
use std::path::Path;
use std::process::Command;
use tracing::debug;

fn opener(platform: Platform, path: &Path, editor: bool) -> Command {
    match platform {
        Platform::Windows if editor => {
            let mut cmd = Command::new("notepad");
            cmd.arg(path);
            cmd
        }
        Platform::Windows => {
            let mut cmd = Command::new("explorer");
            cmd.arg(path);
            cmd
        }
        Platform::MacOs => {
            let mut cmd = Command::new("open");
            if editor {
                cmd.arg("-t");
            }
            cmd.arg(path);
            cmd
        }
        Platform::Linux => {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }
}

fn run(mut cmd: Command, path: &Path, platform: Platform) -> Result<(), LaunchError> {
    debug!("Opening {} with {:?}", path.display(), cmd.get_program());
    let status = cmd.status()?;
    // explorer.exe reports 1 even when the window opened
    if status.success() || platform == Platform::Windows {
        Ok(())
    } else {
        Err(LaunchError::OpenFailed {
            path: path.to_path_buf(),
            code: status.code(),
        })
    }
}

/// Show a directory in the platform file manager.
pub fn open_folder(path: &Path) -> Result<(), LaunchError> {
    if !path.is_dir() {
        return Err(LaunchError::NotADirectory(path.to_path_buf()));
    }
    let platform = Platform::current();
    run(opener(platform, path, false), path, platform)
}

/// Open a text file in the platform's default text editor.
pub fn open_in_editor(path: &Path) -> Result<(), LaunchError> {
    let platform = Platform::current();
    run(opener(platform, path, true), path, platform)
}
