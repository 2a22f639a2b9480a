//! Fault-injecting wrapper around any `KeyValueStore`.
//!
//! Each operation can be switched to fail independently at runtime, and reads
//! can be made to return a fixed payload instead of the stored value. Used to
//! exercise the degraded paths of storage consumers.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{KeyValueStore, StorageError};

#[derive(Debug)]
pub struct FaultyStore<S> {
    inner: S,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
    fail_remove: AtomicBool,
    corrupt_reads: Mutex<Option<String>>,
}

impl<S: KeyValueStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_get: AtomicBool::new(false),
            fail_set: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
            corrupt_reads: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn fail_set(&self, fail: bool) {
        self.fail_set.store(fail, Ordering::SeqCst);
    }

    pub fn fail_remove(&self, fail: bool) {
        self.fail_remove.store(fail, Ordering::SeqCst);
    }

    /// Makes every successful `get` return `payload` regardless of what is
    /// stored. `None` restores normal reads.
    pub async fn corrupt_reads(&self, payload: Option<String>) {
        *self.corrupt_reads.lock().await = payload;
    }
}

fn injected(op: &str, key: &str) -> StorageError {
    StorageError::Unavailable(format!("injected {op} failure for key {key:?}"))
}

#[async_trait]
impl<S: KeyValueStore> KeyValueStore for FaultyStore<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(injected("get", key));
        }
        if let Some(payload) = self.corrupt_reads.lock().await.clone() {
            return Ok(Some(payload));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(injected("set", key));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(injected("remove", key));
        }
        self.inner.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn failures_leave_inner_untouched() {
        let store = FaultyStore::new(MemoryStore::with_entry("user", "kept"));
        store.fail_remove(true);
        store.fail_set(true);

        assert!(store.remove("user").await.is_err());
        assert!(store.set("user", "new").await.is_err());
        assert_eq!(store.get("user").await.unwrap().as_deref(), Some("kept"));

        store.fail_remove(false);
        store.remove("user").await.unwrap();
        assert!(store.inner().is_empty().await);
    }

    #[tokio::test]
    async fn corrupt_reads_override_stored_value() {
        let store = FaultyStore::new(MemoryStore::with_entry("user", "good"));
        store.corrupt_reads(Some("{not json".into())).await;
        assert_eq!(store.get("user").await.unwrap().as_deref(), Some("{not json"));

        store.corrupt_reads(None).await;
        assert_eq!(store.get("user").await.unwrap().as_deref(), Some("good"));
    }
}
