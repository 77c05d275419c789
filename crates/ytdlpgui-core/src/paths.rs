//! Locations of the files the application keeps between runs

use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.ini";
pub const HISTORY_FILE: &str = "download_history.json";
pub const TAGS_FILE: &str = "tags.json";
pub const COOKIE_FILE: &str = "cookie.txt";

/// All persisted files live side by side in one data directory.
#[derive(Debug, Clone)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data directory defaults to the working directory.
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn history(&self) -> PathBuf {
        self.root.join(HISTORY_FILE)
    }

    pub fn tags(&self) -> PathBuf {
        self.root.join(TAGS_FILE)
    }

    pub fn cookie(&self) -> PathBuf {
        self.root.join(COOKIE_FILE)
    }
}
