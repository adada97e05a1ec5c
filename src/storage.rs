// src/storage.rs

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AppError;

/// Durable key/value storage for serialized session state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored under `key` yet.
    async fn read(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn write(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Hydration(format!("failed to read '{}': {}", key, e))),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write-then-rename so a crash never leaves a half-written document behind.
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &target).await?;

        tracing::debug!("Persisted '{}' ({} bytes)", key, value.len());
        Ok(())
    }
}

/// In-process store, used by tests and when no storage directory is wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

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
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_round_trip_and_missing_key() {
        let dir = std::env::temp_dir().join(format!("math-quest-store-{}", std::process::id()));
        let store = FileStore::new(&dir);

        assert_eq!(store.read("absent").await.unwrap(), None);

        store.write("profile", r#"{"streak":2}"#).await.unwrap();
        store.write("profile", r#"{"streak":3}"#).await.unwrap();
        assert_eq!(
            store.read("profile").await.unwrap().as_deref(),
            Some(r#"{"streak":3}"#)
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn memory_store_overwrites() {
        let store = MemoryStore::with_entries([("k", "1")]);
        store.write("k", "2").await.unwrap();
        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("2"));
    }
}
