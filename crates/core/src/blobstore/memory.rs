//! In-memory blob store for tests and development.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use bytes::Bytes;

use super::error::BlobStoreError;
use super::types::{BlobInfo, BlobRecord};
use super::BlobStore;

/// In-memory [`BlobStore`] backend.
///
/// Keeps every object in a mutex-guarded map. Intended for tests and local
/// development; per-key atomicity holds trivially because every operation
/// takes the single lock.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<String, (BlobInfo, Bytes)>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().map_or(0, |objects| objects.len())
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn objects(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, (BlobInfo, Bytes)>>, BlobStoreError> {
        self.objects
            .lock()
            .map_err(|_| BlobStoreError::backend("object map lock poisoned"))
    }
}

impl BlobStore for MemoryBlobStore {
    async fn put(&self, info: BlobInfo, content: Bytes) -> Result<BlobInfo, BlobStoreError> {
        self.objects()?
            .insert(info.key.clone(), (info.clone(), content));
        Ok(info)
    }

    async fn get(&self, key: &str) -> Result<Option<BlobRecord>, BlobStoreError> {
        Ok(self.objects()?.get(key).map(|(info, content)| BlobRecord {
            info: info.clone(),
            content: content.clone(),
        }))
    }

    async fn delete(&self, key: &str) -> Result<bool, BlobStoreError> {
        Ok(self.objects()?.remove(key).is_some())
    }

    async fn stat(&self, key: &str) -> Result<Option<BlobInfo>, BlobStoreError> {
        Ok(self.objects()?.get(key).map(|(info, _)| info.clone()))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobInfo>, BlobStoreError> {
        let mut infos: Vec<BlobInfo> = self
            .objects()?
            .values()
            .filter(|(info, _)| info.key.starts_with(prefix))
            .map(|(info, _)| info.clone())
            .collect();
        infos.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(infos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(key: &str) -> BlobInfo {
        BlobInfo::new(key, "file.pdf", 3, "application/pdf")
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryBlobStore::new();
        store
            .put(info("id/a"), Bytes::from_static(b"abc"))
            .await
            .unwrap();

        let record = store.get("id/a").await.unwrap().unwrap();
        assert_eq!(record.content, Bytes::from_static(b"abc"));
        assert_eq!(record.info.original_name, "file.pdf");
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let store = MemoryBlobStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
        assert!(store.stat("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let store = MemoryBlobStore::new();
        store
            .put(info("id/a"), Bytes::from_static(b"abc"))
            .await
            .unwrap();

        assert!(store.delete("id/a").await.unwrap());
        assert!(!store.delete("id/a").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_prefix_and_sorts() {
        let store = MemoryBlobStore::new();
        store
            .put(info("id/b"), Bytes::from_static(b"b"))
            .await
            .unwrap();
        store
            .put(info("id/a"), Bytes::from_static(b"a"))
            .await
            .unwrap();
        store
            .put(info("other/c"), Bytes::from_static(b"c"))
            .await
            .unwrap();

        let listed = store.list("id/").await.unwrap();
        let keys: Vec<&str> = listed.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["id/a", "id/b"]);
    }

    #[tokio::test]
    async fn test_list_unknown_prefix_is_empty() {
        let store = MemoryBlobStore::new();
        assert!(store.list("nope/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let store = MemoryBlobStore::new();
        store
            .put(info("id/a"), Bytes::from_static(b"old"))
            .await
            .unwrap();
        store
            .put(info("id/a"), Bytes::from_static(b"new"))
            .await
            .unwrap();

        let record = store.get("id/a").await.unwrap().unwrap();
        assert_eq!(record.content, Bytes::from_static(b"new"));
        assert_eq!(store.len(), 1);
    }
}
