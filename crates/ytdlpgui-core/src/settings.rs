//! Download directory and downloader location, kept in `settings.ini`

use crate::error::SettingsError;
use crate::ini::IniFile;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const SETTINGS_SECTION: &str = "Settings";
pub const DEFAULT_YTDLP: &str = "yt-dlp";
/// Environment variables overriding the file, e.g. `YTDLPGUI_DOWNLOAD_PATH`.
pub const ENV_PREFIX: &str = "YTDLPGUI_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory passed to the downloader with `-P`
    pub download_path: PathBuf,
    /// Downloader executable, either a bare name looked up on PATH or a path
    pub ytdlp_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_path: platform_default_downloads(),
            ytdlp_path: DEFAULT_YTDLP.to_string(),
        }
    }
}

impl Settings {
    /// The directory to download into right now.
    ///
    /// The configured directory may have been removed since the settings were
    /// read; the platform default is used in that case.
    pub fn effective_download_dir(&self) -> PathBuf {
        if self.download_path.is_dir() {
            self.download_path.clone()
        } else {
            let fallback = platform_default_downloads();
            warn!(
                "Download directory {} does not exist, using {}",
                self.download_path.display(),
                fallback.display()
            );
            fallback
        }
    }
}

/// The user's Downloads folder, or the working directory when there is none.
pub fn platform_default_downloads() -> PathBuf {
    let candidate = dirs::download_dir().or_else(|| dirs::home_dir().map(|h| h.join("Downloads")));
    match candidate {
        Some(dir) if dir.is_dir() => dir,
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// How absolute paths are spelled on a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    Windows,
    Posix,
}

impl PathStyle {
    pub fn current() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }
}

/// Best-effort check that `raw` was written on another operating system.
///
/// Settings files get copied between machines; a `C:\...` path on macOS or a
/// `/Users/...` path on Windows is useless there.
pub fn is_foreign_path(raw: &str, style: PathStyle) -> bool {
    match style {
        PathStyle::Posix => {
            let drive = regex::Regex::new(r"^[A-Za-z]:([\\/]|$)")
                .map(|re| re.is_match(raw))
                .unwrap_or(false);
            drive || raw.contains('\\')
        }
        // `//server/share` is a UNC path, not a POSIX one
        PathStyle::Windows => raw.starts_with('/') && !raw.starts_with("//"),
    }
}

/// Replace foreign paths with the default and anchor relative ones.
fn correct_download_path(path: PathBuf, style: PathStyle) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw.trim().is_empty() || is_foreign_path(&raw, style) {
        let fallback = platform_default_downloads();
        warn!(
            "download_path {:?} does not belong to this platform, using {}",
            raw,
            fallback.display()
        );
        return fallback;
    }
    if path.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            return cwd.join(path);
        }
    }
    path
}

/// Owns the settings file and the settings last read from it.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    current: Settings,
}

impl SettingsStore {
    /// Bind to `path` and read it once.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = Self::read(&path);
        Self { path, current }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> &Settings {
        &self.current
    }

    /// Read the file now. Never fails: anything unreadable yields defaults.
    pub fn load(&self) -> Settings {
        Self::read(&self.path)
    }

    /// Re-read after the file was edited outside the application.
    pub fn reload(&mut self) -> &Settings {
        self.current = Self::read(&self.path);
        info!("Reloaded settings from {}", self.path.display());
        &self.current
    }

    /// Write defaults if the file is missing, then load it back.
    pub fn ensure_exists(&mut self) -> Result<&Settings, SettingsError> {
        if !self.path.exists() {
            info!("Creating {}", self.path.display());
            write_settings(&self.path, &Settings::default())?;
        }
        Ok(self.reload())
    }

    fn read(path: &Path) -> Settings {
        Self::read_with_env(path, Env::prefixed(ENV_PREFIX))
    }

    fn read_with_env(path: &Path, env: Env) -> Settings {
        let from_file = match load_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                if path.exists() {
                    warn!("{}, using defaults", e);
                } else {
                    debug!("No settings file at {}, using defaults", path.display());
                }
                Settings::default()
            }
        };

        let mut settings = apply_env(from_file, env);
        settings.download_path = correct_download_path(settings.download_path, PathStyle::current());
        settings
    }
}

/// Strict load: every key must be present in the `[Settings]` section.
pub fn load_file(path: &Path) -> Result<Settings, SettingsError> {
    Figment::from(IniFile::section(path, SETTINGS_SECTION))
        .extract()
        .map_err(|e| SettingsError::LoadError(e.to_string()))
}

fn apply_env(settings: Settings, env: Env) -> Settings {
    Figment::from(Serialized::defaults(settings.clone()))
        .merge(env)
        .extract()
        .unwrap_or_else(|e| {
            warn!("Ignoring YTDLPGUI_* overrides: {}", e);
            settings
        })
}

/// Serialize `settings` in the same layout Python's configparser writes.
pub fn write_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let text = format!(
        "[{}]\ndownload_path = {}\nytdlp_path = {}\n\n",
        SETTINGS_SECTION,
        settings.download_path.display(),
        settings.ytdlp_path
    );
    std::fs::write(path, text).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_foreign_path_on_posix() {
        assert!(is_foreign_path("C:\\Users\\me\\Downloads", PathStyle::Posix));
        assert!(is_foreign_path("d:/media", PathStyle::Posix));
        assert!(is_foreign_path("C:", PathStyle::Posix));
        assert!(is_foreign_path("Downloads\\videos", PathStyle::Posix));
        assert!(!is_foreign_path("/home/me/Downloads", PathStyle::Posix));
        assert!(!is_foreign_path("downloads", PathStyle::Posix));
        assert!(!is_foreign_path("/tmp/a:b", PathStyle::Posix));
    }

    #[test]
    fn test_is_foreign_path_on_windows() {
        assert!(is_foreign_path("/Users/me/Downloads", PathStyle::Windows));
        assert!(!is_foreign_path("C:\\Users\\me\\Downloads", PathStyle::Windows));
        assert!(!is_foreign_path("//nas/media", PathStyle::Windows));
        assert!(!is_foreign_path("Downloads", PathStyle::Windows));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("settings.ini"));
        assert_eq!(store.current(), &Settings::default());
    }

    #[test]
    fn test_missing_key_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        let target = dir.path().join("out");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(&path, format!("[Settings]\ndownload_path = {}\n", target.display())).unwrap();

        let store = SettingsStore::open(&path);
        assert_eq!(store.current(), &Settings::default());
    }

    #[test]
    fn test_load_reads_both_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        let target = dir.path().join("out");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(
            &path,
            format!(
                "[Settings]\ndownload_path = {}\nytdlp_path = /opt/bin/yt-dlp\n",
                target.display()
            ),
        )
        .unwrap();

        let settings = SettingsStore::open(&path).load();
        assert_eq!(settings.download_path, target);
        assert_eq!(settings.ytdlp_path, "/opt/bin/yt-dlp");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_foreign_download_path_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        std::fs::write(
            &path,
            "[Settings]\ndownload_path = C:\\Users\\me\\Downloads\nytdlp_path = yt-dlp\n",
        )
        .unwrap();

        let settings = SettingsStore::open(&path).load();
        assert_eq!(settings.download_path, platform_default_downloads());
        assert_eq!(settings.ytdlp_path, "yt-dlp");
    }

    #[test]
    fn test_ensure_exists_round_trips_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        let mut store = SettingsStore::open(&path);

        let created = store.ensure_exists().unwrap().clone();
        assert!(path.exists());
        assert_eq!(created, Settings::default());
        assert_eq!(load_file(&path).unwrap(), created);
    }

    #[test]
    fn test_ensure_exists_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        let original = Settings {
            download_path: dir.path().to_path_buf(),
            ytdlp_path: "/opt/yt-dlp".to_string(),
        };
        write_settings(&path, &original).unwrap();

        let mut store = SettingsStore::open(&path);
        assert_eq!(store.ensure_exists().unwrap(), &original);
    }

    #[test]
    fn test_reload_picks_up_external_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        let mut store = SettingsStore::open(&path);
        store.ensure_exists().unwrap();

        let edited = Settings {
            download_path: dir.path().to_path_buf(),
            ytdlp_path: "/usr/bin/yt-dlp".to_string(),
        };
        write_settings(&path, &edited).unwrap();
        assert_ne!(store.current(), &edited);

        assert_eq!(store.reload(), &edited);
    }

    /// Read `path` with `vars` set under a prefix no other test uses.
    fn read_with_vars(path: &Path, prefix: &str, vars: &[(&str, &str)]) -> Settings {
        for (key, value) in vars {
            std::env::set_var(format!("{prefix}{key}"), value);
        }
        let settings = SettingsStore::read_with_env(path, Env::prefixed(prefix));
        for (key, _) in vars {
            std::env::remove_var(format!("{prefix}{key}"));
        }
        settings
    }

    #[test]
    fn test_env_overrides_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        let target = dir.path().join("from-env");
        std::fs::create_dir(&target).unwrap();
        write_settings(
            &path,
            &Settings {
                download_path: dir.path().to_path_buf(),
                ytdlp_path: "yt-dlp".to_string(),
            },
        )
        .unwrap();

        let target_str = target.display().to_string();
        let settings = read_with_vars(
            &path,
            "YTDLPGUI_OVERRIDE_TEST_",
            &[("DOWNLOAD_PATH", target_str.as_str()), ("YTDLP_PATH", "/opt/bin/yt-dlp")],
        );
        assert_eq!(settings.download_path, target);
        assert_eq!(settings.ytdlp_path, "/opt/bin/yt-dlp");
    }

    #[test]
    fn test_env_applies_without_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = read_with_vars(
            &dir.path().join("settings.ini"),
            "YTDLPGUI_NO_FILE_TEST_",
            &[("YTDLP_PATH", "/usr/local/bin/yt-dlp")],
        );
        assert_eq!(settings.ytdlp_path, "/usr/local/bin/yt-dlp");
        assert_eq!(settings.download_path, platform_default_downloads());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_foreign_env_path_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        write_settings(
            &path,
            &Settings {
                download_path: dir.path().to_path_buf(),
                ytdlp_path: "yt-dlp".to_string(),
            },
        )
        .unwrap();

        let settings = read_with_vars(
            &path,
            "YTDLPGUI_FOREIGN_TEST_",
            &[("DOWNLOAD_PATH", "D:\\Videos")],
        );
        assert_eq!(settings.download_path, platform_default_downloads());
        assert_eq!(settings.ytdlp_path, "yt-dlp");
    }

    #[test]
    fn test_effective_download_dir_falls_back() {
        let settings = Settings {
            download_path: PathBuf::from("/definitely/not/here"),
            ytdlp_path: DEFAULT_YTDLP.to_string(),
        };
        assert_eq!(settings.effective_download_dir(), platform_default_downloads());
    }
}
