//! Preference store implementations.
//!
//! [`FilePreferenceStore`] keeps a flat `key = "value"` TOML table on disk and
//! mirrors it in memory. [`MemoryPreferenceStore`] is the ephemeral variant
//! used by tests and by `--ephemeral` runs of the CLI.

use marketpulse_core::error::Result;
use marketpulse_core::preference::PreferenceStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::storage::AtomicTomlFile;

type Table = BTreeMap<String, String>;

fn lock(table: &Mutex<Table>) -> MutexGuard<'_, Table> {
    // A panic mid-update cannot leave a BTreeMap half-written.
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Disk-backed preference store.
///
/// Reads are served from an in-memory copy loaded at open time. Every write
/// updates that copy first and then performs a locked read-modify-write of
/// the file, so concurrent processes sharing the file lose nothing but the
/// conflicting key (last write wins).
pub struct FilePreferenceStore {
    file: AtomicTomlFile<Table>,
    cache: Mutex<Table>,
}

impl FilePreferenceStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and also treated as empty; the next write replaces it with the
    /// in-memory entries.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let file = AtomicTomlFile::new(path);
        let initial = match file.load() {
            Ok(Some(table)) => table,
            Ok(None) => Table::new(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable preference store: {}", e);
                Table::new()
            }
        };

        tracing::debug!(
            path = %file.path().display(),
            entries = initial.len(),
            "Opened preference store"
        );

        Self {
            file,
            cache: Mutex::new(initial),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.cache).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.cache).insert(key.to_string(), value.to_string());

        self.file.update_or_replace(
            |table| {
                table.insert(key.to_string(), value.to_string());
            },
            || lock(&self.cache).clone(),
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let was_cached = lock(&self.cache).remove(key).is_some();
        if !was_cached && matches!(self.file.load(), Ok(None)) {
            return Ok(());
        }

        self.file.update_or_replace(
            |table| {
                table.remove(key);
            },
            || lock(&self.cache).clone(),
        )?;
        Ok(())
    }
}

/// In-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<Table>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Copy of every entry, sorted by key.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        lock(&self.entries).clone()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}
