//! Core `adapters` crate for abstracting on-device key-value storage.
//!
//! This crate defines the `KeyValueStore` trait, which outlines the small
//! asynchronous get/set/remove surface the client persists its state through,
//! and provides a central point for accessing concrete implementations
//! (in-memory, file-backed, and a fault-injecting wrapper for tests).

pub mod errors;
pub mod fault;
pub mod file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

pub use errors::StorageError;
pub use fault::FaultyStore;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Asynchronous string key-value storage that survives process restarts.
///
/// Implementations must treat removal of a missing key as success.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` when nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes the value stored under `key`.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key).await
    }
}
