//! Blob-store contract and backends.
//!
//! The durable store is an external collaborator; this module pins down the
//! contract the rest of the crate consumes:
//!
//! - [`BlobStore`] - put/get/delete/stat/list-by-prefix over byte blobs with
//!   string-keyed metadata, addressed by a hierarchical `/`-delimited key
//! - [`MemoryBlobStore`] - in-memory backend for tests and development
//! - [`OpendalBlobStore`] - production backend over Apache OpenDAL
//!   (S3-compatible, Azure Blob, local filesystem)

mod config;
mod error;
mod memory;
mod opendal;
mod types;

use std::future::Future;

pub use config::StorageProvider;
pub use error::BlobStoreError;
pub use memory::MemoryBlobStore;
pub use opendal::OpendalBlobStore;
pub use types::{BlobInfo, BlobRecord, OWNER_TAG_KEY};

use bytes::Bytes;

/// Contract consumed from the underlying blob store.
///
/// Implementations provide per-key atomicity for a single put or delete; no
/// cross-key transactions are assumed anywhere in this crate.
pub trait BlobStore: Send + Sync {
    /// Store a blob under `info.key`, replacing any existing object.
    /// Returns the persisted metadata.
    fn put(
        &self,
        info: BlobInfo,
        content: Bytes,
    ) -> impl Future<Output = Result<BlobInfo, BlobStoreError>> + Send;

    /// Fetch a blob and its metadata. Returns `None` when the key is absent.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<BlobRecord>, BlobStoreError>> + Send;

    /// Delete a blob. Returns whether an object was actually removed.
    fn delete(&self, key: &str) -> impl Future<Output = Result<bool, BlobStoreError>> + Send;

    /// Fetch metadata only. Returns `None` when the key is absent.
    fn stat(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<BlobInfo>, BlobStoreError>> + Send;

    /// List metadata for every object whose key starts with `prefix`.
    /// An empty or unknown prefix yields an empty vec, never an error.
    fn list(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<BlobInfo>, BlobStoreError>> + Send;
}
