//! Key-value persistence for progress records
//!
//! Records are stored as JSON strings under namespaced keys, one key per
//! (base key, user). `FileStore` keeps one file per key in the data
//! directory; `MemoryStore` is used in tests and for throwaway sessions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use thiserror::Error;

use super::migrate::MigrationReport;
use super::record::{OverallProgress, ProgressRecord, is_path_completed};
use crate::config::Config;
use crate::content::model::{Difficulty, Module};

/// Characters escaped when a key becomes a file name
const FILE_NAME_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

/// Base key of the cross-tier overall progress record
pub const LEARNING_PROGRESS_KEY: &str = "learningProgress";

/// Errors from the key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key cannot be used as a storage name (only the empty key)
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A value could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The platform data directory could not be determined
    #[error("No data directory available: {0}")]
    NoDataDir(String),
}

/// A string key-value store with last-write-wins semantics
pub trait KeyValueStore {
    /// Read the value under a key
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under a key
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key, returning whether it existed
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;

    /// All keys currently stored
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Store keeping one `<key>.json` file per key in a directory
///
/// Keys are percent-encoded into file names, so any user id can be stored.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    const EXTENSION: &'static str = "json";

    /// Use the given directory, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io { path: dir.clone(), source })?;
        Ok(Self { dir })
    }

    /// Use the `store` directory under the platform data directory
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = Config::data_dir().map_err(|e| StoreError::NoDataDir(e.to_string()))?;
        Self::open(dir.join("store"))
    }

    /// Directory holding the files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        let name = utf8_percent_encode(key, FILE_NAME_SET);
        Ok(self.dir.join(format!("{}.{}", name, Self::EXTENSION)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::write(&path, value).map_err(|source| StoreError::Io { path, source })
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|source| StoreError::Io { path: self.dir.clone(), source })?;

        let mut keys: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if !path.extension().is_some_and(|ext| ext == Self::EXTENSION) {
                    return None;
                }
                let stem = path.file_stem()?.to_str()?;
                percent_decode_str(stem).decode_utf8().ok().map(|key| key.into_owned())
            })
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// Scope a base key to a user, or leave it bare when nobody is signed in
pub fn scoped_key(base: &str, user_id: Option<&str>) -> String {
    match user_id {
        Some(user) => format!("{}_user_{}", base, user),
        None => base.to_string(),
    }
}

/// Reads and writes progress records for one learner
pub struct ProgressStore<S> {
    store: S,
    user_id: Option<String>,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S, user_id: Option<String>) -> Self {
        Self { store, user_id }
    }

    /// Signed-in user, if any
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Storage key of a tier's progress record
    pub fn progress_key(&self, difficulty: Difficulty) -> String {
        scoped_key(difficulty.progress_key(), self.user_id())
    }

    /// Storage key of the overall progress record
    pub fn overall_key(&self) -> String {
        scoped_key(LEARNING_PROGRESS_KEY, self.user_id())
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Bring the underlying store up to the current schema for this learner
    pub fn migrate(&mut self) -> Result<MigrationReport, StoreError> {
        super::migrate::migrate(&mut self.store, self.user_id.as_deref())
    }

    /// Load a tier's progress, validated against the current modules
    ///
    /// Missing, unreadable or corrupt records come back as an empty record.
    pub fn load(&self, difficulty: Difficulty, modules: &[Module]) -> ProgressRecord {
        let key = self.progress_key(difficulty);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ProgressRecord::default(),
            Err(e) => {
                tracing::warn!(%key, "failed to read saved progress: {}", e);
                return ProgressRecord::default();
            }
        };

        match serde_json::from_str::<ProgressRecord>(&raw) {
            Ok(record) => {
                let mut validated = record.validated_against(modules);
                validated.total_modules = modules.len();
                validated.path_completed = is_path_completed(modules, &validated);
                tracing::debug!(
                    %key,
                    completed = validated.completed_modules.len(),
                    attempts = validated.quiz_attempts.len(),
                    "restored progress"
                );
                validated
            }
            Err(e) => {
                tracing::warn!(%key, "saved progress is corrupt, starting fresh: {}", e);
                ProgressRecord::default()
            }
        }
    }

    /// Write a full snapshot of a tier's progress
    ///
    /// `pathCompleted`, `totalModules` and `lastUpdated` are recomputed;
    /// the returned record is exactly what was written.
    pub fn save(
        &mut self,
        difficulty: Difficulty,
        modules: &[Module],
        record: &ProgressRecord,
    ) -> Result<ProgressRecord, StoreError> {
        let snapshot = ProgressRecord {
            total_modules: modules.len(),
            last_updated: Some(Utc::now()),
            path_completed: is_path_completed(modules, record),
            ..record.clone()
        };

        let key = self.progress_key(difficulty);
        let contents = serde_json::to_string(&snapshot)?;
        self.store.set(&key, &contents)?;
        tracing::debug!(%key, path_completed = snapshot.path_completed, "saved progress");
        Ok(snapshot)
    }

    /// Load the overall progress record; corrupt data reads as empty
    pub fn load_overall(&self) -> OverallProgress {
        let key = self.overall_key();
        match self.store.get(&key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(%key, "overall progress is corrupt, starting fresh: {}", e);
                OverallProgress::default()
            }),
            Ok(None) => OverallProgress::default(),
            Err(e) => {
                tracing::warn!(%key, "failed to read overall progress: {}", e);
                OverallProgress::default()
            }
        }
    }

    /// Set a tier's overall completion percentage
    pub fn set_overall(&mut self, difficulty: Difficulty, percent: u8) -> Result<(), StoreError> {
        let mut overall = self.load_overall();
        overall.set(difficulty, percent);
        let key = self.overall_key();
        self.store.set(&key, &serde_json::to_string(&overall)?)
    }
}
