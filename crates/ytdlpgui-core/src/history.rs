//! Download history, kept in `download_history.json`

use crate::error::StoreError;
use crate::store::{read_json, write_json};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Entries kept on disk; the oldest are dropped first.
pub const HISTORY_CAP: usize = 1000;
/// Entries shown in the history list.
pub const RECENT_LIMIT: usize = 50;
pub const UNKNOWN_TITLE: &str = "Unknown";

const DISPLAY_WIDTH: usize = 40;

fn unknown_title() -> String {
    UNKNOWN_TITLE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    #[serde(default = "unknown_title")]
    pub title: String,
    /// Local time of the latest download attempt
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: NaiveDateTime,
}

/// `isoformat()` output with or without a UTC offset. Anything else reads as
/// the epoch instead of failing the entry.
fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_timestamp).unwrap_or_default())
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    raw.parse::<NaiveDateTime>().ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Local).naive_local())
    })
}

impl HistoryEntry {
    /// `title | url`, each cut to 40 characters.
    pub fn display_line(&self) -> String {
        format!(
            "{} | {}",
            truncate(&self.title, DISPLAY_WIDTH),
            truncate(&self.url, DISPLAY_WIDTH)
        )
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

/// Insertion-ordered, one entry per URL.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self { path, entries }
    }

    /// Read the history file, returning an empty list on any failure.
    pub fn load(path: &Path) -> Vec<HistoryEntry> {
        if !path.exists() {
            debug!("No history at {}", path.display());
            return Vec::new();
        }
        try_load(path).unwrap_or_else(|e| {
            warn!("Error loading history: {}", e);
            Vec::new()
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a download attempt for `url` and persist.
    ///
    /// A repeat visit refreshes the timestamp in place, and the title only
    /// when a non-empty one is given.
    pub fn add(&mut self, url: &str, title: Option<&str>) {
        self.add_at(url, title, Local::now().naive_local());
    }

    pub fn add_at(&mut self, url: &str, title: Option<&str>, at: NaiveDateTime) {
        let title = title.map(str::trim).filter(|t| !t.is_empty());

        match self.entries.iter_mut().find(|e| e.url == url) {
            Some(entry) => {
                entry.timestamp = at;
                if let Some(title) = title {
                    entry.title = title.to_string();
                }
            }
            None => self.entries.push(HistoryEntry {
                url: url.to_string(),
                title: title.map(str::to_string).unwrap_or_else(unknown_title),
                timestamp: at,
            }),
        }

        if self.entries.len() > HISTORY_CAP {
            let excess = self.entries.len() - HISTORY_CAP;
            self.entries.drain(..excess);
        }

        self.save();
    }

    /// The last `n` entries, most recent first.
    pub fn recent(&self, n: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(n).collect()
    }

    /// Entry at `index` of the displayed list (`recent(RECENT_LIMIT)`).
    pub fn recent_at(&self, index: usize) -> Option<&HistoryEntry> {
        if index >= RECENT_LIMIT {
            return None;
        }
        self.entries.iter().rev().nth(index)
    }

    /// Forget everything. Callers confirm with the user first.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.save();
    }

    /// Persist, logging instead of failing.
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            warn!("Error saving history: {}", e);
        }
    }

    pub fn try_save(&self) -> Result<(), StoreError> {
        write_json(&self.path, &self.entries)
    }
}

/// Strict about the file being a JSON array, lenient about its elements:
/// an entry that cannot be read is skipped and the rest are kept.
pub fn try_load(path: &Path) -> Result<Vec<HistoryEntry>, StoreError> {
    let raw: Vec<serde_json::Value> = read_json(path)?;
    Ok(raw
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<HistoryEntry>(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable history entry in {}: {}", path.display(), e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn store_in(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::open(dir.path().join("download_history.json"))
    }

    #[test]
    fn test_repeat_url_updates_single_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add_at("https://x.com/v", Some("First"), t0());
        store.add_at("https://x.com/v", Some("Second"), t0() + Duration::minutes(5));

        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].title, "Second");
        assert_eq!(store.entries()[0].timestamp, t0() + Duration::minutes(5));
    }

    #[test]
    fn test_repeat_without_title_keeps_old_title() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add_at("U", Some("Kept"), t0());
        store.add_at("U", None, t0() + Duration::seconds(1));
        store.add_at("U", Some("   "), t0() + Duration::seconds(2));

        assert_eq!(store.entries()[0].title, "Kept");
        assert_eq!(store.entries()[0].timestamp, t0() + Duration::seconds(2));
    }

    #[test]
    fn test_new_entry_without_title_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add("A", None);
        store.add("B", Some(""));

        assert!(store.entries().iter().all(|e| e.title == UNKNOWN_TITLE));
    }

    #[test]
    fn test_repeat_keeps_insertion_position() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add_at("A", None, t0());
        store.add_at("B", None, t0());
        store.add_at("A", None, t0() + Duration::seconds(1));

        let urls: Vec<_> = store.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, ["A", "B"]);
    }

    #[test]
    fn test_cap_drops_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        for i in 0..=HISTORY_CAP {
            store.add_at(&format!("https://x.com/{i}"), None, t0() + Duration::seconds(i as i64));
        }

        assert_eq!(store.len(), HISTORY_CAP);
        assert_eq!(store.entries()[0].url, "https://x.com/1");
        assert_eq!(store.entries()[HISTORY_CAP - 1].url, format!("https://x.com/{HISTORY_CAP}"));
        assert_eq!(HistoryStore::load(store.path()).len(), HISTORY_CAP);
    }

    #[test]
    fn test_recent_is_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        for i in 0..200 {
            store.add_at(&format!("u{i}"), None, t0() + Duration::seconds(i));
        }

        let recent = store.recent(RECENT_LIMIT);
        assert_eq!(recent.len(), 50);
        assert_eq!(recent[0].url, "u199");
        assert_eq!(recent[49].url, "u150");
        assert_eq!(store.entries()[0].url, "u0");
    }

    #[test]
    fn test_recent_at_maps_display_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        for i in 0..60 {
            store.add_at(&format!("u{i}"), None, t0());
        }

        assert_eq!(store.recent_at(0).unwrap().url, "u59");
        assert_eq!(store.recent_at(49).unwrap().url, "u10");
        assert!(store.recent_at(50).is_none());
    }

    #[test]
    fn test_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_at("https://x.com/v", Some("Clip"), t0());

        let reopened = store_in(&dir);
        assert_eq!(reopened.entries(), store.entries());

        let text = std::fs::read_to_string(store.path()).unwrap();
        let (url, title, ts) = (
            text.find("\"url\"").unwrap(),
            text.find("\"title\"").unwrap(),
            text.find("\"timestamp\"").unwrap(),
        );
        assert!(url < title && title < ts);
        assert!(text.contains("\n  {"));
    }

    #[test]
    fn test_reads_python_isoformat() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_history.json");
        std::fs::write(
            &path,
            r#"[
  {"url": "https://a", "title": "音乐", "timestamp": "2024-05-01T12:00:00.123456"},
  {"url": "https://b", "timestamp": "2024-05-02T08:30:00"}
]"#,
        )
        .unwrap();

        let store = HistoryStore::open(&path);
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[0].title, "音乐");
        assert_eq!(store.entries()[1].title, UNKNOWN_TITLE);
    }

    #[test]
    fn test_bad_entries_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_history.json");
        std::fs::write(
            &path,
            r#"[
  {"url": "https://a", "title": "A", "timestamp": "2024-05-01T12:00:00"},
  {"title": "no url", "timestamp": "2024-05-01T12:00:00"},
  "not an object",
  {"url": "https://b", "title": "B", "timestamp": "2024-05-01T12:00:00+08:00"},
  {"url": "https://c", "title": "C"},
  {"url": "https://d", "title": "D", "timestamp": "yesterday"}
]"#,
        )
        .unwrap();

        let mut store = HistoryStore::open(&path);
        let urls: Vec<_> = store.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, ["https://a", "https://b", "https://c", "https://d"]);
        assert_eq!(store.entries()[0].timestamp, t0());
        assert_eq!(store.entries()[2].timestamp, NaiveDateTime::default());
        assert_eq!(store.entries()[3].timestamp, NaiveDateTime::default());

        store.add_at("https://e", None, t0());
        assert_eq!(HistoryStore::load(&path).len(), 5);
    }

    #[test]
    fn test_offset_timestamp_is_converted_to_local() {
        let expected = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+08:00")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parse_timestamp("2024-05-01T12:00:00+08:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:00:00.5"), Some(t0() + Duration::milliseconds(500)));
        assert_eq!(parse_timestamp("soon"), None);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_history.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(HistoryStore::open(&path).is_empty());
        assert!(try_load(&path).is_err());
    }

    #[test]
    fn test_clear_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add("A", Some("a"));
        store.clear();

        assert!(store.is_empty());
        assert!(store_in(&dir).is_empty());
    }

    #[test]
    fn test_display_line_truncates() {
        let entry = HistoryEntry {
            url: format!("https://example.com/{}", "x".repeat(40)),
            title: "short".to_string(),
            timestamp: t0(),
        };
        let line = entry.display_line();
        let (title, url) = line.split_once(" | ").unwrap();
        assert_eq!(title, "short");
        assert_eq!(url.chars().count(), 40);
        assert!(url.ends_with("..."));
    }
}
