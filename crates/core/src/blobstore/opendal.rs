//! Production blob-store backend using Apache OpenDAL.

use std::collections::HashMap;
use std::time::SystemTime;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use opendal::{EntryMode, ErrorKind, Metadata, Operator, services};
use tracing::info;

use super::config::StorageProvider;
use super::error::BlobStoreError;
use super::types::{BlobInfo, BlobRecord};
use super::BlobStore;

// BlobInfo fields that do not map onto native object attributes travel in
// user metadata under reserved keys, alongside the open metadata mapping.
const META_ORIGINAL_NAME: &str = "depot-original-name";
const META_SIZE: &str = "depot-size";
const META_CREATED_AT: &str = "depot-created-at";

/// [`BlobStore`] backend over an OpenDAL [`Operator`].
///
/// Works against any service OpenDAL supports; the providers wired up here
/// are S3-compatible stores, Azure Blob and the local filesystem.
pub struct OpendalBlobStore {
    operator: Operator,
}

impl OpendalBlobStore {
    /// Create a backend from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_provider(provider: &StorageProvider) -> Result<Self, BlobStoreError> {
        let operator = Self::create_operator(provider)?;
        info!(provider = provider.name(), "blob store backend initialized");
        Ok(Self { operator })
    }

    /// Wrap an already-configured operator.
    #[must_use]
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, BlobStoreError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| BlobStoreError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Ok(Operator::new(builder)
                    .map_err(|e| BlobStoreError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| BlobStoreError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| BlobStoreError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    fn user_metadata(info: &BlobInfo) -> HashMap<String, String> {
        let mut user = info.metadata.clone();
        user.insert(META_ORIGINAL_NAME.to_string(), info.original_name.clone());
        user.insert(META_SIZE.to_string(), info.size.to_string());
        user.insert(META_CREATED_AT.to_string(), info.created_at.to_rfc3339());
        user
    }

    fn info_from_metadata(key: &str, meta: &Metadata) -> BlobInfo {
        let mut metadata = meta.user_metadata().cloned().unwrap_or_default();

        let original_name = metadata
            .remove(META_ORIGINAL_NAME)
            .unwrap_or_else(|| key.rsplit('/').next().unwrap_or(key).to_string());
        let size = metadata
            .remove(META_SIZE)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| meta.content_length());
        let created_at = metadata
            .remove(META_CREATED_AT)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| meta.last_modified().map(|ts| DateTime::<Utc>::from(SystemTime::from(ts))))
            .unwrap_or_else(Utc::now);
        let content_type = meta
            .content_type()
            .map_or_else(|| "application/octet-stream".to_string(), String::from);

        BlobInfo {
            key: key.to_string(),
            original_name,
            size,
            content_type,
            created_at,
            metadata,
        }
    }
}

impl BlobStore for OpendalBlobStore {
    async fn put(&self, info: BlobInfo, content: Bytes) -> Result<BlobInfo, BlobStoreError> {
        self.operator
            .write_with(&info.key, content)
            .content_type(&info.content_type)
            .user_metadata(Self::user_metadata(&info))
            .await?;
        Ok(info)
    }

    async fn get(&self, key: &str) -> Result<Option<BlobRecord>, BlobStoreError> {
        let Some(info) = self.stat(key).await? else {
            return Ok(None);
        };
        let buffer = match self.operator.read(key).await {
            Ok(buffer) => buffer,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(BlobRecord {
            info,
            content: buffer.to_bytes(),
        }))
    }

    async fn delete(&self, key: &str) -> Result<bool, BlobStoreError> {
        match self.operator.stat(key).await {
            Ok(_) => {
                self.operator.delete(key).await?;
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn stat(&self, key: &str) -> Result<Option<BlobInfo>, BlobStoreError> {
        match self.operator.stat(key).await {
            Ok(meta) => Ok(Some(Self::info_from_metadata(key, &meta))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobInfo>, BlobStoreError> {
        let prefix = if prefix.is_empty() || prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{prefix}/")
        };

        let entries = match self.operator.list_with(&prefix).recursive(true).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        // List entries do not reliably carry user metadata; stat each object.
        let mut infos = Vec::new();
        for entry in entries {
            if entry.metadata().mode() != EntryMode::FILE {
                continue;
            }
            if let Some(info) = self.stat(entry.path()).await? {
                infos.push(info);
            }
        }
        infos.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(infos)
    }
}
