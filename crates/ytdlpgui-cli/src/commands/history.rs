use anyhow::{bail, Result};

use crate::args::HistoryAction;
use crate::prompt::confirm;
use ytdlpgui_core::{history::RECENT_LIMIT, AppState};

pub async fn run(action: Option<HistoryAction>, state: &mut AppState) -> Result<()> {
    match action.unwrap_or(HistoryAction::List { limit: RECENT_LIMIT }) {
        HistoryAction::List { limit } => {
            let recent = state.history.recent(listing_limit(limit));
            if recent.is_empty() {
                println!("No download history");
                return Ok(());
            }
            for (i, entry) in recent.iter().enumerate() {
                println!(
                    "{:>3}. {}  {}",
                    i + 1,
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.display_line()
                );
            }
        }
        HistoryAction::Get { index } => {
            let Some(entry) = index.checked_sub(1).and_then(|i| state.history.recent_at(i)) else {
                bail!("No history entry at position {}", index);
            };
            println!("{}", entry.url);
        }
        HistoryAction::Clear { yes } => {
            if state.history.is_empty() {
                println!("History is already empty");
            } else if confirm("Are you sure you want to clear all history?", yes)? {
                state.history.clear();
                println!("History cleared");
            }
        }
    }
    Ok(())
}

/// `history get` only reaches the first `RECENT_LIMIT` positions, so the
/// listing never numbers more than that.
fn listing_limit(requested: usize) -> usize {
    requested.min(RECENT_LIMIT)
}
