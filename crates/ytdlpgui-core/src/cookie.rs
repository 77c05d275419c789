//! The user's `cookie.txt` and the throwaway copies handed to yt-dlp

use crate::error::{CookieError, ValidationError};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{debug, info};

pub const COOKIE_TEMPLATE: &str = "\
# Netscape HTTP Cookie File
# This file was generated by ytdlpgui
# You can edit this file with your cookies

";

/// A Netscape-format cookie file at a fixed location.
///
/// yt-dlp rewrites the cookie file it is given, so the original is never
/// passed on directly; see [`CookieJar::stage`].
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Fails with the instruction to create the file when it is missing.
    pub fn require(&self) -> Result<(), ValidationError> {
        if self.exists() {
            Ok(())
        } else {
            Err(ValidationError::CookieFileMissing(self.path.clone()))
        }
    }

    /// Create the file with a header comment if it does not exist yet.
    /// Returns whether it was created.
    pub fn ensure_template(&self) -> Result<bool, CookieError> {
        if self.path.exists() {
            return Ok(false);
        }
        std::fs::write(&self.path, COOKIE_TEMPLATE).map_err(|source| CookieError::Create {
            path: self.path.clone(),
            source,
        })?;
        info!("Created {}", self.path.display());
        Ok(true)
    }

    pub fn looks_empty(&self) -> Result<bool, CookieError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| CookieError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(has_no_cookies(&text))
    }

    /// Copy the file to a fresh temporary path.
    pub fn stage(&self) -> Result<StagedCookie, CookieError> {
        let looks_empty = self.looks_empty()?;

        let temp = tempfile::Builder::new()
            .prefix("ytdlpgui-cookie-")
            .suffix(".txt")
            .tempfile()
            .map_err(CookieError::Stage)?
            .into_temp_path();
        std::fs::copy(&self.path, &temp).map_err(CookieError::Stage)?;

        debug!("Staged {} at {}", self.path.display(), temp.display());
        Ok(StagedCookie { temp, looks_empty })
    }
}

/// True when every non-blank line is a comment.
///
/// `#HttpOnly_` lines are cookies despite the leading `#`.
pub fn has_no_cookies(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .all(|l| l.starts_with('#') && !l.starts_with("#HttpOnly_"))
}

/// A temporary copy of the cookie file, removed on drop unless kept.
#[derive(Debug)]
pub struct StagedCookie {
    temp: TempPath,
    looks_empty: bool,
}

impl StagedCookie {
    pub fn path(&self) -> &Path {
        &self.temp
    }

    pub fn looks_empty(&self) -> bool {
        self.looks_empty
    }

    /// Leave the copy on disk for a process that outlives us.
    pub fn keep(self) -> Result<PathBuf, CookieError> {
        self.temp.keep().map_err(|e| CookieError::Stage(e.error))
    }
}
