//! Rename tags, kept in `tags.json`

use crate::error::StoreError;
use crate::store::{read_json, write_json};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One row of the tag autocomplete list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSuggestion {
    Tag(String),
    /// Trailing entry that wipes every tag instead of being used as one
    ClearAll,
}

impl fmt::Display for TagSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagSuggestion::Tag(tag) => write!(f, "{}", tag),
            TagSuggestion::ClearAll => write!(f, "[clear all tags]"),
        }
    }
}

/// Insertion-ordered set of tags.
#[derive(Debug)]
pub struct TagStore {
    path: PathBuf,
    tags: Vec<String>,
}

impl TagStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tags = Self::load(&path);
        Self { path, tags }
    }

    /// Read the tag file, returning an empty set on any failure.
    pub fn load(path: &Path) -> Vec<String> {
        if !path.exists() {
            return Vec::new();
        }
        match read_json::<Vec<String>>(path) {
            Ok(raw) => {
                let mut tags: Vec<String> = Vec::with_capacity(raw.len());
                for tag in raw {
                    if !tags.contains(&tag) {
                        tags.push(tag);
                    }
                }
                tags
            }
            Err(e) => {
                warn!("Error loading tags: {}", e);
                Vec::new()
            }
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns whether `tag` was new. Only a new tag touches the file.
    pub fn add_if_absent(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        debug!("New tag: {}", tag);
        self.save();
        true
    }

    /// Forget every tag. Callers confirm with the user first.
    pub fn clear_all(&mut self) {
        self.tags.clear();
        self.save();
        info!("Tags cleared");
    }

    /// Tags starting with `prefix` (case-insensitive), then the clear sentinel.
    pub fn suggestions(&self, prefix: &str) -> Vec<TagSuggestion> {
        let prefix = prefix.trim().to_lowercase();
        self.tags
            .iter()
            .filter(|t| t.to_lowercase().starts_with(&prefix))
            .cloned()
            .map(TagSuggestion::Tag)
            .chain(std::iter::once(TagSuggestion::ClearAll))
            .collect()
    }

    /// Act on a picked suggestion.
    ///
    /// A real tag comes back as the value to use. The sentinel clears the
    /// store when `confirm` agrees and never yields a value.
    pub fn select(&mut self, suggestion: TagSuggestion, confirm: impl FnOnce() -> bool) -> Option<String> {
        match suggestion {
            TagSuggestion::Tag(tag) => Some(tag),
            TagSuggestion::ClearAll => {
                if confirm() {
                    self.clear_all();
                }
                None
            }
        }
    }

    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            warn!("Error saving tags: {}", e);
        }
    }

    pub fn try_save(&self) -> Result<(), StoreError> {
        write_json(&self.path, &self.tags)
    }
}
