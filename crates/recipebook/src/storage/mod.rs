//! Key-value storage for recipebook.
//!
//! The recipe collection lives in a single slot of a key-value store. This
//! module defines that seam ([`KeyValueStore`]) and the backends behind it:
//!
//! - [`MemoryStore`]: process memory, for tests and throwaway sessions
//! - [`FileStore`]: one file per key in a directory, replaced atomically
//! - [`SqliteStore`]: a `kv` table in a `SQLite` database

pub mod file;
pub mod memory;
pub mod migrations;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{BackendKind, Config};
use crate::error::{Error, Result};

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A byte-oriented key-value store.
///
/// Writes replace the whole value of a slot; there is no partial update.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Short backend name for logging and status output.
    fn name(&self) -> &'static str;

    /// Read a slot. `Ok(None)` means the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the contents of a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    async fn write(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove a slot. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// Open the backend selected by the configuration.
///
/// # Errors
///
/// Returns an error if the backend cannot be opened or has no path.
pub fn open_backend(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let backend = config.storage.backend;
    debug!("Opening {} storage backend", backend);

    match (backend, config.storage_path()) {
        (BackendKind::Memory, _) => Ok(Arc::new(MemoryStore::new())),
        (BackendKind::Sqlite, Some(path)) => Ok(Arc::new(SqliteStore::open(path)?)),
        (BackendKind::File, Some(path)) => Ok(Arc::new(FileStore::open(path)?)),
        (kind, None) => Err(Error::internal(format!(
            "no storage path resolved for {kind} backend"
        ))),
    }
}
