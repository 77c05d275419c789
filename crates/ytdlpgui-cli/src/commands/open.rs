use anyhow::Result;

use ytdlpgui_core::AppState;
use ytdlpgui_launch::open_folder;

pub async fn run(state: &AppState) -> Result<()> {
    let dir = state.settings.current().effective_download_dir();
    println!("Opening {}", dir.display());
    open_folder(&dir)?;
    Ok(())
}
