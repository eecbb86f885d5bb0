//! Durable key-value slot for the booking list.
//!
//! [`KeyValueStore`] is the narrow seam to whatever holds the data: an
//! in-memory map for tests or a directory of JSON files for the binary.
//! [`LedgerStore`] sits on top and owns the booking-list schema.

use crate::error::StorageError;
use crate::ledger::{BookingLedger, LedgerSnapshot};
use crate::types::Booking;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Slot holding the JSON booking list
pub const BOOKINGS_KEY: &str = "railreserve_bookings";

/// Boxed future returned by [`KeyValueStore`] methods
pub type StorageFuture<'a, T> = BoxFuture<'a, Result<T, StorageError>>;

/// String-keyed storage of string values.
///
/// Returns boxed futures so the trait stays dyn-compatible.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot; `Ok(None)` if it was never written
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>>;

    /// Replace a slot's contents
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn set<'a>(&'a self, key: &'a str, value: String) -> StorageFuture<'a, ()>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store, lost on exit
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
        async move { Ok(self.slots.read().await.get(key).cloned()) }.boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> StorageFuture<'a, ()> {
        async move {
            self.slots.write().await.insert(key.to_string(), value);
            Ok(())
        }
        .boxed()
    }
}

// ============================================================================
// File store
// ============================================================================

/// One `<key>.json` file per slot inside a data directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write never leaves a half-written slot behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`; the directory is created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
        async move {
            let path = self.slot_path(key)?;
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(source) => Err(StorageError::Io {
                    key: key.to_string(),
                    source,
                }),
            }
        }
        .boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> StorageFuture<'a, ()> {
        async move {
            let path = self.slot_path(key)?;
            let tmp = self.dir.join(format!(".{key}.json.tmp"));
            let io_err = |source| StorageError::Io {
                key: key.to_string(),
                source,
            };

            tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;
            tokio::fs::write(&tmp, value).await.map_err(io_err)?;
            tokio::fs::rename(&tmp, &path).await.map_err(io_err)?;

            tracing::trace!(path = %path.display(), "Slot written");
            Ok(())
        }
        .boxed()
    }
}

// ============================================================================
// Ledger persistence
// ============================================================================

/// Reads and writes the booking list slot.
///
/// Saves carry the ledger revision they were taken at. A save whose revision
/// is not newer than the last one written is dropped, so effects that finish
/// out of order can never roll the slot back.
pub struct LedgerStore {
    store: Arc<dyn KeyValueStore>,
    last_written: Mutex<u64>,
}

impl std::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStore").finish_non_exhaustive()
    }
}

impl LedgerStore {
    /// Persist the ledger through `store`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            last_written: Mutex::new(0),
        }
    }

    /// Rehydrate the ledger.
    ///
    /// An absent, unreadable or malformed slot yields an empty ledger; the
    /// problem is logged and startup carries on.
    pub async fn load(&self) -> BookingLedger {
        let raw = match self.store.get(BOOKINGS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!("No stored bookings, starting with an empty ledger");
                return BookingLedger::new();
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored bookings, starting empty");
                return BookingLedger::new();
            },
        };

        match serde_json::from_str::<Vec<Booking>>(&raw) {
            Ok(bookings) => {
                tracing::info!(count = bookings.len(), "Loaded stored bookings");
                BookingLedger::from_bookings(bookings)
            },
            Err(e) => {
                tracing::warn!(error = %e, "Stored bookings are malformed, starting empty");
                BookingLedger::new()
            },
        }
    }

    /// Write `snapshot` unless a newer one has already been written.
    ///
    /// Returns `true` if the slot was written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if serialization or the write fails; the
    /// revision is then not recorded, so a later save can retry.
    pub async fn save(&self, snapshot: LedgerSnapshot) -> Result<bool, StorageError> {
        let mut last_written = self.last_written.lock().await;
        if snapshot.revision <= *last_written {
            tracing::debug!(
                revision = snapshot.revision,
                last_written = *last_written,
                "Skipping stale ledger snapshot"
            );
            return Ok(false);
        }

        let json = serde_json::to_string(&snapshot.bookings)?;
        self.store.set(BOOKINGS_KEY, json).await?;
        *last_written = snapshot.revision;

        tracing::debug!(
            revision = snapshot.revision,
            count = snapshot.bookings.len(),
            "Ledger persisted"
        );
        Ok(true)
    }
}
