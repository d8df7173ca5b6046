//! In-memory key-value backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::KeyValueStore;

/// Slots held in a `HashMap`. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one slot already written.
    #[must_use]
    pub fn with_slot(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        if let Ok(mut slots) = store.slots.lock() {
            slots.insert(key.into(), value.into());
        }
        store
    }

    fn slots(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.slots
            .lock()
            .map_err(|_| Error::internal("memory store lock poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.slots()?.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        self.slots()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.slots()?.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_slot() {
        let store = MemoryStore::with_slot("recipes.v1", "[]");
        let value = store.read("recipes.v1").await.unwrap();
        assert_eq!(value.as_deref(), Some(&b"[]"[..]));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = MemoryStore::new();
        store.write("a", b"1").await.unwrap();
        store.write("b", b"2").await.unwrap();

        assert_eq!(store.read("a").await.unwrap().as_deref(), Some(&b"1"[..]));
        assert_eq!(store.read("b").await.unwrap().as_deref(), Some(&b"2"[..]));
    }
}
