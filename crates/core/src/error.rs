//! Domain error taxonomy.
//!
//! Every public operation in this crate fails with a [`DepotError`]. The set
//! is closed: callers never see a raw backend or crypto error, only one of
//! the variants below.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::blobstore::BlobStoreError;
use crate::validation::{RejectionCategory, ValidationError};

/// Result type alias using [`DepotError`].
pub type DepotResult<T> = Result<T, DepotError>;

/// Depot operation errors.
#[derive(Debug, Error)]
pub enum DepotError {
    /// No such object, or nothing existed to remove.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The object exists but is not owned by the caller. Deliberately also
    /// covers tag decryption errors so that crypto details never leak
    /// through the authorization boundary.
    #[error("caller does not own object: {0}")]
    NotOwner(String),

    /// One or more validators rejected the content. Carries every rejecting
    /// validator's category and reason, not just the first.
    #[error("content rejected: {filename}")]
    InvalidContent {
        /// Original filename of the rejected content.
        filename: String,
        /// Reason per rejection category.
        reasons: BTreeMap<RejectionCategory, String>,
    },

    /// Any underlying blob-store or crypto fault not otherwise classified.
    /// Retryable by the caller; never retried internally.
    #[error("storage failure: {0}")]
    StorageFailure(String),
}

impl DepotError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Create a not owner error.
    #[must_use]
    pub fn not_owner(key: impl Into<String>) -> Self {
        Self::NotOwner(key.into())
    }

    /// Create a storage failure.
    #[must_use]
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageFailure(msg.into())
    }

    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::NotOwner(_) => "NOT_OWNER",
            Self::InvalidContent { .. } => "INVALID_CONTENT",
            Self::StorageFailure(_) => "STORAGE_FAILURE",
        }
    }
}

impl From<BlobStoreError> for DepotError {
    fn from(err: BlobStoreError) -> Self {
        match err {
            BlobStoreError::NotFound { key } => Self::NotFound(key),
            other => Self::StorageFailure(other.to_string()),
        }
    }
}

impl From<ValidationError> for DepotError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Rejected { filename, reasons } => {
                Self::InvalidContent { filename, reasons }
            }
            ValidationError::Execution(msg) => Self::StorageFailure(msg),
        }
    }
}
