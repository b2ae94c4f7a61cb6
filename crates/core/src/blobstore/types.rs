//! Blob data model.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata key holding the encrypted owner tag.
///
/// Every object created through the ownership-scoped store carries this
/// entry; an object without it is treated as foreign and owned by nobody.
pub const OWNER_TAG_KEY: &str = "eier";

/// Immutable metadata for a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobInfo {
    /// Hierarchical storage key, unique per object (e.g. `"<folder>/<token>"`).
    pub key: String,
    /// Human filename as supplied by the caller. Never part of the key.
    pub original_name: String,
    /// Content length in bytes, as submitted (before encryption).
    pub size: u64,
    /// MIME type of the content.
    pub content_type: String,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Open string-to-string mapping for extensibility. The encrypted owner
    /// tag lives under [`OWNER_TAG_KEY`].
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl BlobInfo {
    /// Create metadata for a new blob, stamped with the current instant.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        original_name: impl Into<String>,
        size: u64,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            original_name: original_name.into(),
            size,
            content_type: content_type.into(),
            created_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The encrypted owner tag, if present.
    #[must_use]
    pub fn owner_tag(&self) -> Option<&str> {
        self.metadata.get(OWNER_TAG_KEY).map(String::as_str)
    }
}

/// A stored object: content plus metadata.
///
/// Records are replaced on overwrite, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRecord {
    /// Blob metadata.
    pub info: BlobInfo,
    /// Blob content.
    pub content: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_tag_reads_from_metadata() {
        let info = BlobInfo::new("id/f1", "invoice.pdf", 42, "application/pdf")
            .with_metadata(OWNER_TAG_KEY, "opaque-tag");
        assert_eq!(info.owner_tag(), Some("opaque-tag"));
    }

    #[test]
    fn test_owner_tag_absent() {
        let info = BlobInfo::new("id/f1", "invoice.pdf", 42, "application/pdf");
        assert_eq!(info.owner_tag(), None);
    }
}
