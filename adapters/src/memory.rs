//! In-memory implementation of the `KeyValueStore` trait.
//!
//! Clones of a `MemoryStore` share the same underlying map, so a value written
//! through one handle is visible through every other. This is what lets tests
//! simulate an application restart: drop the consumer, keep a clone of the
//! store, and build a fresh consumer over it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{KeyValueStore, StorageError};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("user", "{}").await.unwrap();
        assert_eq!(other.get("user").await.unwrap().as_deref(), Some("{}"));

        other.remove("user").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn removing_missing_key_is_ok() {
        let store = MemoryStore::with_entry("other", "1");
        store.remove("user").await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
