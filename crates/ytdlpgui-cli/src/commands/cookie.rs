use anyhow::Result;

use crate::args::CookieAction;
use ytdlpgui_core::AppState;
use ytdlpgui_launch::open_in_editor;

pub async fn run(action: Option<CookieAction>, state: &AppState) -> Result<()> {
    let jar = &state.cookies;
    match action.unwrap_or(CookieAction::Edit) {
        CookieAction::Edit => {
            if jar.ensure_template()? {
                println!("Created {}", jar.path().display());
                println!("Paste your cookies in Netscape format, then save the file");
            }
            open_in_editor(jar.path())?;
            if jar.looks_empty()? {
                println!("Warning: {} has no cookies yet", jar.path().display());
            }
        }
        CookieAction::Path => println!("{}", jar.path().display()),
    }
    Ok(())
}
