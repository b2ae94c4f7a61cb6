//! Ownership-scoped store implementation.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use tracing::warn;

use crate::blobstore::{BlobInfo, BlobRecord, BlobStore, OWNER_TAG_KEY};
use crate::crypto::{ContentCipher, CryptoError};
use crate::error::{DepotError, DepotResult};

/// Owner-safe, confidential view over an underlying blob store.
///
/// Content is encrypted with the owner identity bound in as associated
/// data, and the owner identity itself is sealed into the object's metadata
/// as an opaque tag. The tag gate and the content binding are independent:
/// even if the tag comparison were bypassed, content still fails to decrypt
/// for the wrong owner.
///
/// Stateless apart from its collaborators; safe to share across tasks.
pub struct ScopedStore<B: BlobStore> {
    inner: Arc<B>,
    cipher: Arc<ContentCipher>,
}

impl<B: BlobStore> ScopedStore<B> {
    /// Create a decorator over `inner`.
    #[must_use]
    pub fn new(inner: Arc<B>, cipher: Arc<ContentCipher>) -> Self {
        Self { inner, cipher }
    }

    /// Encrypt and persist a blob, establishing `owner_id` as its owner.
    ///
    /// No ownership check happens here: the writer is, by definition,
    /// establishing ownership. Returns the persisted metadata.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::StorageFailure`] if sealing or the underlying
    /// put fails.
    pub async fn write(
        &self,
        mut info: BlobInfo,
        content: Bytes,
        owner_id: &str,
    ) -> DepotResult<BlobInfo> {
        let tag = self.seal_owner_tag(owner_id)?;
        info.metadata.insert(OWNER_TAG_KEY.to_string(), tag);

        let sealed = self
            .cipher
            .encrypt(&content, owner_id.as_bytes())
            .map_err(|e| DepotError::storage(e.to_string()))?;

        let stored = self
            .inner
            .put(info, Bytes::from(sealed))
            .await
            .map_err(|e| DepotError::storage(e.to_string()))?;
        Ok(stored)
    }

    /// Fetch and decrypt a blob owned by `owner_id`.
    ///
    /// The ownership gate runs before any content is fetched or decrypted.
    /// `Ok(None)` means the metadata existed but the content had vanished by
    /// the time it was read.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::NotFound`] when the key is absent,
    /// [`DepotError::NotOwner`] when the tag does not open for the caller,
    /// and [`DepotError::StorageFailure`] when content that passed the gate
    /// fails authenticated decryption (corruption, not authorization).
    pub async fn read(&self, key: &str, owner_id: &str) -> DepotResult<Option<BlobRecord>> {
        let info = self.require_owned(key, owner_id).await?;

        let Some(record) = self.inner.get(key).await? else {
            return Ok(None);
        };

        let plaintext = self
            .cipher
            .decrypt(&record.content, owner_id.as_bytes())
            .map_err(|_| {
                DepotError::storage(format!(
                    "stored content for '{key}' failed authenticated decryption"
                ))
            })?;

        Ok(Some(BlobRecord {
            info,
            content: Bytes::from(plaintext),
        }))
    }

    /// Delete a blob owned by `owner_id`. Returns whether an object was
    /// actually removed.
    ///
    /// # Errors
    ///
    /// Same ownership gate as [`read`](Self::read).
    pub async fn delete(&self, key: &str, owner_id: &str) -> DepotResult<bool> {
        self.require_owned(key, owner_id).await?;
        Ok(self.inner.delete(key).await?)
    }

    /// Fetch metadata for a blob owned by `owner_id`, without touching the
    /// content.
    ///
    /// # Errors
    ///
    /// Same ownership gate as [`read`](Self::read).
    pub async fn info(&self, key: &str, owner_id: &str) -> DepotResult<BlobInfo> {
        self.require_owned(key, owner_id).await
    }

    /// List metadata for every blob under `prefix` owned by `owner_id`.
    ///
    /// Objects owned by others are silently excluded; a list is a view, not
    /// an authorization check. An empty or unknown prefix yields an empty
    /// vec.
    ///
    /// # Errors
    ///
    /// Returns [`DepotError::StorageFailure`] if the underlying listing
    /// fails.
    pub async fn list(&self, prefix: &str, owner_id: &str) -> DepotResult<Vec<BlobInfo>> {
        let infos = self.inner.list(prefix).await?;
        Ok(infos
            .into_iter()
            .filter(|info| self.owns(info, owner_id))
            .collect())
    }

    /// Resolve metadata and apply the ownership gate.
    async fn require_owned(&self, key: &str, owner_id: &str) -> DepotResult<BlobInfo> {
        let info = self
            .inner
            .stat(key)
            .await?
            .ok_or_else(|| DepotError::not_found(key))?;

        if self.owns(&info, owner_id) {
            Ok(info)
        } else {
            Err(DepotError::not_owner(key))
        }
    }

    /// Whether `info` belongs to `owner_id`.
    ///
    /// Fails closed: a missing tag means not owned (and should never happen
    /// for objects created through this store), and any decryption error is
    /// treated as "not owner" rather than surfaced as a crypto error.
    fn owns(&self, info: &BlobInfo, owner_id: &str) -> bool {
        let Some(tag) = info.owner_tag() else {
            warn!(key = %info.key, "stored object has no owner tag, treating as foreign");
            return false;
        };
        self.open_owner_tag(tag, owner_id)
            .is_ok_and(|owner| owner == owner_id)
    }

    /// Seal `owner_id` into an opaque tag. The owner identity doubles as
    /// the associated data, making the tag self-authenticating: it only
    /// opens when checked against the same identity.
    fn seal_owner_tag(&self, owner_id: &str) -> DepotResult<String> {
        let sealed = self
            .cipher
            .encrypt(owner_id.as_bytes(), owner_id.as_bytes())
            .map_err(|e| DepotError::storage(e.to_string()))?;
        Ok(BASE64.encode(sealed))
    }

    fn open_owner_tag(&self, tag: &str, owner_id: &str) -> Result<String, CryptoError> {
        let raw = BASE64
            .decode(tag)
            .map_err(|_| CryptoError::DecryptionFailure)?;
        let plain = self.cipher.decrypt(&raw, owner_id.as_bytes())?;
        String::from_utf8(plain).map_err(|_| CryptoError::DecryptionFailure)
    }
}
