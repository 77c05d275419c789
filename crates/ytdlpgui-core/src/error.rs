//! Error types for ytdlpgui-core

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuiError>;

#[derive(Error, Debug)]
pub enum GuiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Cookie error: {0}")]
    Cookie(#[from] CookieError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Launch failed: {0}")]
    Launch(#[from] ytdlpgui_launch::LaunchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected before any process is spawned.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Please enter a URL")]
    EmptyUrl,

    #[error("'Use Proxy' is enabled but the proxy address is empty. Provide a proxy or disable it")]
    EmptyProxy,

    #[error("'Use Cookie' is enabled but {0} was not found. Run `ytdlpgui cookie edit` to create and fill it")]
    CookieFileMissing(PathBuf),
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum CookieError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy cookie file to a temporary location: {0}")]
    Stage(#[source] std::io::Error),

    #[error("Failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Raised only by the strict load/save variants; the store methods
/// themselves log and carry on.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
