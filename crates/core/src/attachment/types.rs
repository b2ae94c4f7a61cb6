//! Attachment input types.

use bytes::Bytes;

/// Input for storing a new attachment.
#[derive(Debug, Clone)]
pub struct StoreAttachmentInput {
    /// Logical folder the attachment belongs to (e.g. a submission id).
    pub folder_id: String,
    /// Original filename as supplied by the uploader.
    pub filename: String,
    /// MIME type of the content.
    pub content_type: String,
    /// File content.
    pub content: Bytes,
    /// Owner identity resolved by the authentication layer.
    pub owner_id: String,
}
