use anyhow::Result;

use crate::args::SettingsAction;
use ytdlpgui_core::{AppState, Settings};
use ytdlpgui_launch::open_in_editor;

pub async fn run(action: Option<SettingsAction>, state: &mut AppState) -> Result<()> {
    match action.unwrap_or(SettingsAction::Show) {
        SettingsAction::Show => show(state.settings.current(), state),
        SettingsAction::Edit => {
            state.settings.ensure_exists()?;
            println!("Opening {}", state.settings.path().display());
            open_in_editor(state.settings.path())?;
            state.settings.reload();
            show(state.settings.current(), state);
        }
        SettingsAction::Path => println!("{}", state.settings.path().display()),
    }
    Ok(())
}

fn show(settings: &Settings, state: &AppState) {
    println!("ytdlpgui settings\n");

    println!("[Settings]");
    println!("  download_path = {:?}", settings.download_path);
    println!("  ytdlp_path = {:?}", settings.ytdlp_path);

    if !settings.download_path.is_dir() {
        println!("\n  download_path does not exist yet; downloads go to the platform default");
    }

    println!("\nData files:");
    println!("  settings = {}", state.paths.settings().display());
    println!("  history  = {}", state.paths.history().display());
    println!("  tags     = {}", state.paths.tags().display());
    println!("  cookie   = {}", state.paths.cookie().display());
    println!("\nEnvironment overrides: YTDLPGUI_DOWNLOAD_PATH, YTDLPGUI_YTDLP_PATH");
}
