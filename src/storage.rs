//! Storage layer for serverdesk
//!
//! The whole [`Store`] is persisted as one JSON document under a fixed key.
//! Backends implement [`StoragePort`] by reading and writing that raw
//! payload; decoding, the empty-on-corruption rule, and the
//! load-mutate-save cycle are shared.
//!
//! # Layout
//!
//! ```text
//! <data_dir>/
//!   serverManagementData.json        # the store (key = file stem)
//!   serverManagementData.json.lock   # advisory lock for update cycles
//! ```

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::model::Store;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "serverManagementData";

/// Persistence boundary for the store.
///
/// Implementors only move raw payloads; everything else is provided.
pub trait StoragePort {
    /// Read the raw payload, `None` if nothing has been persisted.
    fn read_raw(&self) -> Result<Option<String>>;

    /// Replace the raw payload.
    fn write_raw(&self, payload: &str) -> Result<()>;

    /// Hold whatever exclusion the backend offers for one update cycle.
    fn exclusive(&self) -> Result<Option<FileLock>> {
        Ok(None)
    }

    /// Load the persisted store.
    ///
    /// Never fails: a missing, unreadable, or malformed payload yields an
    /// empty store. A legacy payload that needed ids assigned is written
    /// back so the ids stay stable across invocations.
    fn load_all(&self) -> Store {
        let (store, normalized) = self.read_store();
        if !normalized {
            return store;
        }
        match self.persist_normalized() {
            Ok(persisted) => persisted,
            Err(err) => {
                tracing::warn!(error = %err, "could not persist normalized store");
                store
            }
        }
    }

    /// Serialize and persist the entire store, overwriting what was there.
    fn save_all(&self, store: &Store) -> Result<()> {
        let payload = serde_json::to_string_pretty(store)?;
        self.write_raw(&payload)?;
        tracing::debug!(servers = store.len(), "store saved");
        Ok(())
    }

    /// Load, apply `f`, and save if `f` reports a change with `Some`.
    ///
    /// An error from `f` leaves the persisted store untouched.
    fn update<T, F>(&self, f: F) -> Result<Option<T>>
    where
        Self: Sized,
        F: FnOnce(&mut Store) -> Result<Option<T>>,
    {
        let _guard = self.exclusive()?;
        let (mut store, normalized) = self.read_store();
        let outcome = f(&mut store)?;
        if outcome.is_some() || normalized {
            self.save_all(&store)?;
        }
        Ok(outcome)
    }

    /// Decode the current payload; true if it had to be normalized.
    fn read_store(&self) -> (Store, bool) {
        match self.read_raw() {
            Ok(raw) => decode_store(raw.as_deref()),
            Err(err) => {
                tracing::warn!(error = %err, "store unreadable, starting empty");
                (Store::default(), false)
            }
        }
    }

    /// Re-read under the lock and save if normalization is still needed.
    fn persist_normalized(&self) -> Result<Store> {
        let _guard = self.exclusive()?;
        let (store, normalized) = self.read_store();
        if normalized {
            self.save_all(&store)?;
            tracing::debug!("persisted ids for legacy records");
        }
        Ok(store)
    }
}

/// Decode a raw payload, degrading to an empty store.
///
/// The flag is true when legacy records were brought up to the current
/// shape and the payload should be rewritten.
pub fn decode_store(raw: Option<&str>) -> (Store, bool) {
    let Some(raw) = raw else {
        return (Store::default(), false);
    };
    if raw.trim().is_empty() || raw.trim() == "null" {
        return (Store::default(), false);
    }
    match serde_json::from_str::<Store>(raw) {
        Ok(mut store) => {
            let normalized = store.normalize();
            (store, normalized)
        }
        Err(err) => {
            tracing::warn!(error = %err, "store payload has unexpected shape, discarding");
            (Store::default(), false)
        }
    }
}

/// JSON file backend.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Directory holding the store file
    data_dir: PathBuf,
    /// Storage key, used as the file stem
    key: String,
    lock_timeout_ms: u64,
}

impl FileStorage {
    /// Create a file backend rooted at `data_dir`
    ///
    /// # Arguments
    /// * `data_dir` - Directory for the store file and its lock
    /// * `key` - Storage key; the file is `<key>.json`
    pub fn new(data_dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            key: key.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// File backend with the default storage key
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(data_dir, DEFAULT_STORAGE_KEY)
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Path to the store file
    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.key))
    }

    /// Path to the lock guarding update cycles
    pub fn lock_file(&self) -> PathBuf {
        lock::lock_path_for(&self.store_file())
    }
}

impl StoragePort for FileStorage {
    fn read_raw(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.store_file()) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn write_raw(&self, payload: &str) -> Result<()> {
        lock::write_atomic(self.store_file(), payload.as_bytes())
    }

    fn exclusive(&self) -> Result<Option<FileLock>> {
        FileLock::acquire(self.lock_file(), self.lock_timeout_ms).map(Some)
    }
}

/// In-memory backend holding the raw payload, like a browser storage slot.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with a raw payload
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(payload.into())),
        }
    }

    /// Current raw payload, if any
    pub fn payload(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl StoragePort for MemoryStorage {
    fn read_raw(&self) -> Result<Option<String>> {
        Ok(self.slot.borrow().clone())
    }

    fn write_raw(&self, payload: &str) -> Result<()> {
        *self.slot.borrow_mut() = Some(payload.to_string());
        Ok(())
    }
}
