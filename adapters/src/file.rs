//! File-backed implementation of the `KeyValueStore` trait.
//!
//! Each key maps to one file under the store's root directory. Writes go to a
//! temporary sibling file which is then renamed over the target, so a crash
//! mid-write leaves either the old value or the new one, never a torn file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::{KeyValueStore, StorageError};

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{key}.json.tmp"))
    }
}

/// Keys become file names, so only a conservative character set is accepted.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| {
                StorageError::Encoding {
                    key: key.to_string(),
                }
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io(path, err)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)
            .await
            .map_err(|err| StorageError::io(&self.root, err))?;

        let temp = self.temp_path_for(key);
        fs::write(&temp, value.as_bytes())
            .await
            .map_err(|err| StorageError::io(&temp, err))?;
        fs::rename(&temp, &path)
            .await
            .map_err(|err| StorageError::io(&path, err))?;

        log::debug!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::io(path, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn scratch_dir() -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "adapters-file-store-{}-{}",
            std::process::id(),
            n
        ))
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let store = FileStore::new(scratch_dir());
        assert_eq!(store.get("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_survives_new_handle() {
        let dir = scratch_dir();
        let store = FileStore::new(&dir);
        store.set("user", r#"{"token":"t"}"#).await.unwrap();

        let reopened = FileStore::new(&dir);
        assert_eq!(
            reopened.get("user").await.unwrap().as_deref(),
            Some(r#"{"token":"t"}"#)
        );
        assert!(!dir.join(".user.json.tmp").exists());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = scratch_dir();
        let store = FileStore::new(&dir);
        store.set("user", "x").await.unwrap();
        store.remove("user").await.unwrap();
        store.remove("user").await.unwrap();
        assert_eq!(store.get("user").await.unwrap(), None);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn rejects_path_like_keys() {
        let store = FileStore::new(scratch_dir());
        for key in ["", "../user", "a/b", ".hidden"] {
            assert!(matches!(
                store.set(key, "x").await,
                Err(StorageError::InvalidKey(_))
            ));
        }
    }
}
