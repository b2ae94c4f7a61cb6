//! Attachment service implementation.

use tracing::info;
use uuid::Uuid;

use crate::blobstore::{BlobInfo, BlobRecord, BlobStore};
use crate::error::{DepotError, DepotResult};
use crate::scoped::ScopedStore;
use crate::validation::ValidationPipeline;

use super::types::StoreAttachmentInput;

/// Mediator facade over validation and the ownership-scoped store.
///
/// Validation fully completes before anything is written; a rejected file
/// never reaches the underlying store. This is the only layer that
/// reclassifies errors: domain errors pass through unchanged, everything
/// else collapses into [`DepotError::StorageFailure`].
pub struct AttachmentService<B: BlobStore> {
    store: ScopedStore<B>,
    pipeline: ValidationPipeline,
}

impl<B: BlobStore> AttachmentService<B> {
    /// Create a new attachment service.
    #[must_use]
    pub fn new(store: ScopedStore<B>, pipeline: ValidationPipeline) -> Self {
        Self { store, pipeline }
    }

    /// Generate a storage key for a new attachment.
    ///
    /// Format: `{folder_id}/{token}` with a freshly generated unique token.
    /// The original filename never becomes part of the key; it may carry
    /// characters unsafe for storage keys, and duplicates must coexist.
    #[must_use]
    pub fn generate_storage_key(folder_id: &str) -> String {
        format!("{}/{}", normalize_folder(folder_id), Uuid::new_v4())
    }

    /// Validate and persist an attachment for its owner.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::InvalidContent`] when a validator rejects the
    /// file, and [`DepotError::StorageFailure`] when a validator cannot run
    /// or the write itself fails.
    pub async fn store(&self, input: StoreAttachmentInput) -> DepotResult<BlobInfo> {
        self.pipeline
            .run(&input.filename, &input.content)
            .await
            .map_err(DepotError::from)?;

        let key = Self::generate_storage_key(&input.folder_id);
        let size = u64::try_from(input.content.len()).unwrap_or(u64::MAX);
        let info = BlobInfo::new(key, &input.filename, size, &input.content_type);

        let stored = self
            .store
            .write(info, input.content, &input.owner_id)
            .await?;

        info!(key = %stored.key, folder = %input.folder_id, "attachment stored");
        Ok(stored)
    }

    /// List the caller's attachments in a folder.
    ///
    /// An empty or unknown folder yields an empty sequence, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::StorageFailure`] if the underlying listing
    /// fails.
    pub async fn list(&self, folder_id: &str, owner_id: &str) -> DepotResult<Vec<BlobInfo>> {
        let prefix = format!("{}/", normalize_folder(folder_id));
        self.store.list(&prefix, owner_id).await
    }

    /// Fetch an attachment owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] when the key is absent (including a
    /// record whose content vanished between metadata and content reads),
    /// and [`DepotError::NotOwner`] when it belongs to someone else.
    pub async fn fetch(&self, key: &str, owner_id: &str) -> DepotResult<BlobRecord> {
        match self.store.read(key, owner_id).await? {
            Some(record) => Ok(record),
            None => Err(DepotError::not_found(key)),
        }
    }

    /// Remove an attachment owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] when nothing existed to remove, so
    /// callers only ever see success or a typed failure.
    pub async fn remove(&self, key: &str, owner_id: &str) -> DepotResult<()> {
        if self.store.delete(key, owner_id).await? {
            info!(key = %key, "attachment removed");
            Ok(())
        } else {
            Err(DepotError::not_found(key))
        }
    }
}

fn normalize_folder(folder_id: &str) -> &str {
    folder_id.trim_matches('/')
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::blobstore::MemoryBlobStore;
    use proptest::prelude::*;

    // Property: derived keys are always `{folder}/{uuid}` with the filename
    // nowhere in the key.
    proptest! {
        #[test]
        fn prop_storage_key_format(folder in "[a-zA-Z0-9_-]{1,32}") {
            let key = AttachmentService::<MemoryBlobStore>::generate_storage_key(&folder);
            let parts: Vec<&str> = key.split('/').collect();
            prop_assert_eq!(parts.len(), 2);
            prop_assert_eq!(parts[0], folder.as_str());
            prop_assert!(Uuid::parse_str(parts[1]).is_ok());
        }
    }

    // Property: nested folders keep their internal separators.
    proptest! {
        #[test]
        fn prop_nested_folder_preserved(
            outer in "[a-z0-9]{1,16}",
            inner in "[a-z0-9]{1,16}",
        ) {
            let folder = format!("{outer}/{inner}");
            let key = AttachmentService::<MemoryBlobStore>::generate_storage_key(&folder);
            let expected_prefix = format!("{outer}/{inner}/");
            prop_assert!(key.starts_with(&expected_prefix));
        }
    }
}
