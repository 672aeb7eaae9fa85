//! File-backed queue store with atomic writes.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

use crate::{QueueDocument, StoreError};

/// Durable store for the scheduled-message queue.
///
/// The queue lives in a single JSON document. `commit` writes the full
/// serialized document to `<path>.tmp` and renames it over `<path>`, so
/// a crash mid-write leaves the previously committed state intact.
///
/// The store provides no locking; callers are responsible for
/// serializing their load-mutate-commit cycles.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Create a store backed by the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the durable document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current queue document.
    ///
    /// A missing file is non-fatal: a warning is logged and an empty
    /// queue returned. Unreadable or corrupt documents are errors.
    pub async fn load(&self) -> Result<QueueDocument, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    path = %self.path.display(),
                    "queue store file is missing, starting from an empty queue"
                );
                Ok(QueueDocument::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Atomically replace the durable copy with `queue`.
    pub async fn commit(&self, queue: &QueueDocument) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(queue)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = OsString::from(self.path.as_os_str());
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::{Destination, ScheduledRecord};

    fn record(id: &str, due_at: i64) -> ScheduledRecord {
        ScheduledRecord {
            id: id.to_string(),
            owner_id: "owner".to_string(),
            destination: Destination {
                guild_id: "guild".to_string(),
                channel_id: "channel".to_string(),
            },
            body: "hello".to_string(),
            due_at,
            attachments: vec!["https://example.com/a.png".to_string()],
            anonymous: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_empty_queue() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("store.json"));

        let queue = store.load().await.unwrap();
        assert!(queue.reminders.is_empty());
    }

    #[tokio::test]
    async fn test_commit_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("store.json"));

        let mut queue = QueueDocument::default();
        queue.insert_sorted(record("a", 100));
        queue.insert_sorted(record("b", 50));

        store.commit(&queue).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, queue);

        // Committing what was just loaded must not change content.
        store.commit(&loaded).await.unwrap();
        assert_eq!(store.load().await.unwrap(), queue);
    }

    #[tokio::test]
    async fn test_commit_replaces_previous_document() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("store.json"));

        let mut first = QueueDocument::default();
        first.insert_sorted(record("a", 100));
        store.commit(&first).await.unwrap();

        let second = QueueDocument::default();
        store.commit(&second).await.unwrap();

        assert!(store.load().await.unwrap().reminders.is_empty());
    }

    #[tokio::test]
    async fn test_commit_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("store.json"));

        store.commit(&QueueDocument::default()).await.unwrap();

        assert!(!store.tmp_path().exists());
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_load_corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let store = JsonStore::new(path);
        assert!(matches!(store.load().await, Err(StoreError::Json(_))));
    }
}
