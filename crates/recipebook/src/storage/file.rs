//! File-per-key backend.
//!
//! Each slot is a file named after its key inside one directory. Writes go to
//! a hidden temporary sibling first and are then renamed over the slot, so a
//! reader sees either the old or the new value, never a torn one. Keys cannot
//! start with a dot, so a temporary file never shares a name with a slot.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};

use super::KeyValueStore;

/// Suffix for in-flight writes.
const TEMP_SUFFIX: &str = ".tmp";

fn temp_name(key: &str) -> String {
    format!(".{key}{TEMP_SUFFIX}")
}

/// Slots stored as files in a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
        }
        debug!("File store rooted at {}", dir.display());
        Ok(Self { dir })
    }

    /// Get the root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the file for a key.
    ///
    /// Keys are restricted to ASCII letters, digits, `.`, `-` and `_` and may
    /// not start with a dot, so they can never escape the directory.
    fn slot_path(&self, key: &str) -> std::result::Result<PathBuf, String> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if valid {
            Ok(self.dir.join(key))
        } else {
            Err(format!("invalid key for file store: {key:?}"))
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self
            .slot_path(key)
            .map_err(|message| Error::storage_read(key, message))?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::storage_read(key, e.to_string())),
        }
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self
            .slot_path(key)
            .map_err(|message| Error::storage_write(key, message))?;
        let temp = self.dir.join(temp_name(key));

        tokio::fs::write(&temp, value)
            .await
            .map_err(|e| Error::storage_write(key, e.to_string()))?;
        tokio::fs::rename(&temp, &path)
            .await
            .map_err(|e| Error::storage_write(key, e.to_string()))?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let path = self
            .slot_path(key)
            .map_err(|message| Error::storage_write(key, message))?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::storage_write(key, e.to_string())),
        }
    }
}
