// src/core/preferences.rs

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::logging::get_data_dir;

pub const PREFERENCES_FILE: &str = "preferences.json";

pub const LOCALE_KEY: &str = "locale";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot serialize preference '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable key/value store for user preferences.
///
/// Values are arbitrary serde types, stored as JSON in a single file. Entries
/// are never invalidated; a later `set` simply overwrites the key.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl PreferenceStore {
    /// Opens the store in the per-user data directory.
    pub fn open_default() -> Result<Self, PreferenceError> {
        Self::open(get_data_dir().join(PREFERENCES_FILE))
    }

    /// Opens the store at `path`. A missing file is an empty store; an unreadable
    /// JSON document is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Map<String, Value>>(&bytes) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Corrupt preferences file, starting empty.");
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(PreferenceError::Io { path, source }),
        };
        debug!(path = %path.display(), entries = values.len(), "Preferences loaded.");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the value stored under `key`, or `None` when it is missing or has
    /// a different shape than `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?.clone();
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key, error = %e, "Stored preference has an unexpected shape.");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), PreferenceError> {
        let value = serde_json::to_value(value)
            .map_err(|source| PreferenceError::Serialize { key: key.to_string(), source })?;
        self.values.insert(key.to_string(), value);
        self.persist()
    }

    fn persist(&self) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| PreferenceError::Io { path: parent.to_path_buf(), source })?;
        }
        let bytes = serde_json::to_vec_pretty(&self.values).map_err(|source| {
            PreferenceError::Serialize { key: String::from("*"), source }
        })?;
        std::fs::write(&self.path, bytes)
            .map_err(|source| PreferenceError::Io { path: self.path.clone(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Theme {
        name: String,
        contrast: u8,
    }

    #[test]
    fn values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE);

        let mut store = PreferenceStore::open(&path).unwrap();
        assert_eq!(store.get::<String>(LOCALE_KEY), None);
        store.set(LOCALE_KEY, &"en").unwrap();
        store
            .set(THEME_KEY, &Theme { name: "sombre".into(), contrast: 3 })
            .unwrap();

        let reopened = PreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.get::<String>(LOCALE_KEY).as_deref(), Some("en"));
        assert_eq!(
            reopened.get::<Theme>(THEME_KEY),
            Some(Theme { name: "sombre".into(), contrast: 3 })
        );
    }

    #[test]
    fn wrong_shape_reads_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PreferenceStore::open(dir.path().join(PREFERENCES_FILE)).unwrap();
        store.set(THEME_KEY, &42).unwrap();
        assert_eq!(store.get::<Theme>(THEME_KEY), None);
        assert_eq!(store.get::<u32>(THEME_KEY), Some(42));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        std::fs::write(&path, b"{not json").unwrap();

        let mut store = PreferenceStore::open(&path).unwrap();
        assert_eq!(store.get::<String>(LOCALE_KEY), None);
        store.set(LOCALE_KEY, &"fr").unwrap();
        assert_eq!(PreferenceStore::open(&path).unwrap().get::<String>(LOCALE_KEY).as_deref(), Some("fr"));
    }
}
