use anyhow::{bail, Result};

use crate::args::TagsAction;
use crate::prompt::confirm;
use ytdlpgui_core::AppState;

const CLEAR_QUESTION: &str = "Are you sure you want to clear all tags?";

pub async fn run(action: Option<TagsAction>, state: &mut AppState) -> Result<()> {
    match action.unwrap_or(TagsAction::List) {
        TagsAction::List => {
            if state.tags.tags().is_empty() {
                println!("No tags yet. Tags are saved when a download is renamed with --tag");
            }
            for tag in state.tags.tags() {
                println!("{}", tag);
            }
        }
        TagsAction::Suggest { prefix } => {
            let suggestions = state.tags.suggestions(prefix.as_deref().unwrap_or(""));
            for (i, suggestion) in suggestions.iter().enumerate() {
                println!("{:>3}. {}", i + 1, suggestion);
            }
        }
        TagsAction::Select { index, prefix, yes } => {
            let mut suggestions = state.tags.suggestions(prefix.as_deref().unwrap_or(""));
            if index == 0 || index > suggestions.len() {
                bail!("No suggestion at position {}", index);
            }
            let suggestion = suggestions.swap_remove(index - 1);

            let mut answer = Ok(false);
            let picked = state.tags.select(suggestion, || {
                answer = confirm(CLEAR_QUESTION, yes);
                matches!(answer, Ok(true))
            });
            let cleared = answer?;

            match picked {
                Some(tag) => println!("{}", tag),
                None if cleared => println!("All tags cleared"),
                None => {}
            }
        }
        TagsAction::Clear { yes } => {
            if confirm(CLEAR_QUESTION, yes)? {
                state.tags.clear_all();
                println!("All tags cleared");
            }
        }
    }
    Ok(())
}
