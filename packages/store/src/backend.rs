//! Storage backends.
//!
//! A backend stores one JSON body per page id together with a version that
//! increases by one on every successful write. It knows nothing about the
//! shape of the body; validation and conversion happen in the gateway.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagecraft_common::validate_key;
use pagecraft_editor::PageId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult, ValidationError};

/// A stored body and its bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub version: u64,
    pub saved_at: DateTime<Utc>,
    pub body: Value,
}

/// Raw page storage
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Stored document for `page_id`, or `None` if there is none
    async fn read(&self, page_id: &PageId) -> StoreResult<Option<StoredDocument>>;

    /// Replace the body for `page_id`, bumping its version.
    /// Returns the document as stored.
    async fn write(&self, page_id: &PageId, body: Value) -> StoreResult<StoredDocument>;

    /// Ids of every stored page, sorted
    async fn list(&self) -> StoreResult<Vec<PageId>>;

    /// Remove a page. Returns whether it existed.
    async fn remove(&self, page_id: &PageId) -> StoreResult<bool>;
}

fn next_document(previous: Option<&StoredDocument>, body: Value) -> StoredDocument {
    StoredDocument {
        version: previous.map_or(1, |doc| doc.version + 1),
        saved_at: Utc::now(),
        body,
    }
}

/// In-memory backend. All data is lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: RwLock<HashMap<PageId, StoredDocument>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn read(&self, page_id: &PageId) -> StoreResult<Option<StoredDocument>> {
        Ok(self.documents.read().await.get(page_id).cloned())
    }

    async fn write(&self, page_id: &PageId, body: Value) -> StoreResult<StoredDocument> {
        let mut documents = self.documents.write().await;
        let document = next_document(documents.get(page_id), body);
        documents.insert(page_id.clone(), document.clone());
        Ok(document)
    }

    async fn list(&self) -> StoreResult<Vec<PageId>> {
        let mut ids: Vec<PageId> = self.documents.read().await.keys().cloned().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(ids)
    }

    async fn remove(&self, page_id: &PageId) -> StoreResult<bool> {
        Ok(self.documents.write().await.remove(page_id).is_some())
    }
}

/// One JSON file per page (`<root>/<page id>.json`).
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// crash mid-write leaves the previous version intact.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

const EXTENSION: &str = "json";

impl FileBackend {
    /// Backend rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for a page id. Ids that could escape the root are rejected.
    fn path_for(&self, page_id: &PageId) -> StoreResult<PathBuf> {
        validate_key(page_id.as_str()).map_err(|_| StoreError::InvalidPageId(page_id.to_string()))?;
        Ok(self.root.join(format!("{}.{}", page_id, EXTENSION)))
    }

    /// Read a page file. A file that does not parse is reported like any
    /// other malformed document, as a validation issue at `$`.
    async fn read_path(page_id: &PageId, path: &Path) -> StoreResult<Option<StoredDocument>> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            tracing::warn!("Unreadable page file {:?}: {}", path, e);
            let mut errors = ValidationError::new(page_id.as_str());
            errors.push("$", e.to_string());
            errors.into()
        })
    }
}

#[async_trait]
impl StoreBackend for FileBackend {
    async fn read(&self, page_id: &PageId) -> StoreResult<Option<StoredDocument>> {
        let path = self.path_for(page_id)?;
        Self::read_path(page_id, &path).await
    }

    async fn write(&self, page_id: &PageId, body: Value) -> StoreResult<StoredDocument> {
        let path = self.path_for(page_id)?;
        fs::create_dir_all(&self.root).await?;

        let previous = Self::read_path(page_id, &path).await?;
        let document = next_document(previous.as_ref(), body);

        let temp = self.root.join(format!(".{}.{}.tmp", page_id, EXTENSION));
        fs::write(&temp, serde_json::to_vec_pretty(&document)?).await?;
        fs::rename(&temp, &path).await?;

        tracing::debug!("Wrote {:?} (version {})", path, document.version);
        Ok(document)
    }

    async fn list(&self) -> StoreResult<Vec<PageId>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_key(stem).is_ok() {
                    ids.push(PageId::new(stem));
                }
            }
        }
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(ids)
    }

    async fn remove(&self, page_id: &PageId) -> StoreResult<bool> {
        let path = self.path_for(page_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_versions_increase() {
        let backend = MemoryBackend::new();
        let id = PageId::from("home");

        assert!(backend.read(&id).await.unwrap().is_none());
        assert_eq!(backend.write(&id, json!({ "a": 1 })).await.unwrap().version, 1);
        assert_eq!(backend.write(&id, json!({ "a": 2 })).await.unwrap().version, 2);

        let stored = backend.read(&id).await.unwrap().unwrap();
        assert_eq!(stored.body, json!({ "a": 2 }));
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn test_memory_list_and_remove() {
        let backend = MemoryBackend::new();
        backend.write(&PageId::from("b"), json!({})).await.unwrap();
        backend.write(&PageId::from("a"), json!({})).await.unwrap();

        let ids = backend.list().await.unwrap();
        assert_eq!(ids, vec![PageId::from("a"), PageId::from("b")]);

        assert!(backend.remove(&PageId::from("a")).await.unwrap());
        assert!(!backend.remove(&PageId::from("a")).await.unwrap());
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("pages"));
        let id = PageId::from("home");

        assert!(backend.read(&id).await.unwrap().is_none());
        assert!(backend.list().await.unwrap().is_empty());

        backend.write(&id, json!({ "blocks": [] })).await.unwrap();
        let second = backend.write(&id, json!({ "blocks": [1] })).await.unwrap();
        assert_eq!(second.version, 2);

        let stored = backend.read(&id).await.unwrap().unwrap();
        assert_eq!(stored, second);
        assert_eq!(backend.list().await.unwrap(), vec![id.clone()]);

        // No temporary files left behind
        let mut names = Vec::new();
        let mut entries = fs::read_dir(backend.root()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["home.json"]);
    }

    #[tokio::test]
    async fn test_file_corrupt_page_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        let id = PageId::from("home");
        std::fs::write(dir.path().join("home.json"), b"{ not json").unwrap();

        match backend.read(&id).await {
            Err(StoreError::Validation(errors)) => {
                assert_eq!(errors.page_id, "home");
                assert_eq!(errors.issues.len(), 1);
                assert_eq!(errors.issues[0].path, "$");
            }
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_file_rejects_unsafe_ids() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        let result = backend.write(&PageId::from("../escape"), json!({})).await;
        assert!(matches!(result, Err(StoreError::InvalidPageId(_))));
    }
}
