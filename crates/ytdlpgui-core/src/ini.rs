//! `[section]` / `key = value` files as a figment provider

use figment::value::{Dict, Map, Value};
use figment::{Error, Metadata, Profile, Provider, Source};
use std::path::PathBuf;

/// Reads one section of an INI file.
///
/// Keys are lower-cased, `=` and `:` both separate key from value, and lines
/// starting with `#` or `;` are comments. A missing file or section is an
/// error, so callers can tell "no settings" apart from "empty settings".
#[derive(Debug, Clone)]
pub struct IniFile {
    path: PathBuf,
    section: String,
}

impl IniFile {
    pub fn section(path: impl Into<PathBuf>, section: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            section: section.into(),
        }
    }
}

impl Provider for IniFile {
    fn metadata(&self) -> Metadata {
        Metadata::from("INI file", Source::File(self.path.clone()))
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::from(format!("{}: {}", self.path.display(), e)))?;
        let dict = parse_section(&text, &self.section).map_err(Error::from)?;
        Ok(Profile::Default.collect(dict))
    }
}

pub(crate) fn parse_section(text: &str, section: &str) -> Result<Dict, String> {
    let mut current: Option<&str> = None;
    let mut found = false;
    let mut dict = Dict::new();

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim();
            found |= name == section;
            current = Some(name);
            continue;
        }

        let Some(split) = line.find(['=', ':']) else {
            return Err(format!("line {}: expected `key = value`, got {:?}", lineno + 1, raw));
        };
        let Some(name) = current else {
            return Err(format!("line {}: key outside of any section", lineno + 1));
        };
        if name != section {
            continue;
        }

        let key = line[..split].trim().to_lowercase();
        let value = line[split + 1..].trim().to_string();
        dict.insert(key, Value::from(value));
    }

    if found {
        Ok(dict)
    } else {
        Err(format!("no section: {:?}", section))
    }
}
