//! Validation outcome types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a validator rejected a file.
///
/// Closed enumeration used for user-facing error detail.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCategory {
    /// Malware found by the scan service.
    VirusDetected,
    /// File type not in the accepted set.
    UnsupportedType,
    /// Document structure is broken.
    MalformedDocument,
    /// File exceeds the configured size ceiling.
    FileTooLarge,
}

impl RejectionCategory {
    /// Convert to the stable string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VirusDetected => "virus_detected",
            Self::UnsupportedType => "unsupported_type",
            Self::MalformedDocument => "malformed_document",
            Self::FileTooLarge => "file_too_large",
        }
    }

    /// Parse from the stable string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "virus_detected" => Some(Self::VirusDetected),
            "unsupported_type" => Some(Self::UnsupportedType),
            "malformed_document" => Some(Self::MalformedDocument),
            "file_too_large" => Some(Self::FileTooLarge),
            _ => None,
        }
    }
}

/// Verdict of a single validator on a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The file passed this validator.
    Valid {
        /// Filename that was checked.
        filename: String,
    },
    /// The file was rejected by this validator.
    Invalid {
        /// Filename that was checked.
        filename: String,
        /// Human-readable rejection reason.
        reason: String,
        /// Rejection category.
        category: RejectionCategory,
    },
}

impl ValidationOutcome {
    /// Create a valid outcome.
    #[must_use]
    pub fn valid(filename: impl Into<String>) -> Self {
        Self::Valid {
            filename: filename.into(),
        }
    }

    /// Create an invalid outcome.
    #[must_use]
    pub fn invalid(
        filename: impl Into<String>,
        reason: impl Into<String>,
        category: RejectionCategory,
    ) -> Self {
        Self::Invalid {
            filename: filename.into(),
            reason: reason.into(),
            category,
        }
    }

    /// Whether the file passed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Unexpected validator execution failure.
///
/// Not a verdict: a validator that cannot run (a scan-service timeout, say)
/// fails the whole pipeline instead of rejecting the file.
#[derive(Debug, Error)]
#[error("validator '{validator}' failed: {message}")]
pub struct ValidatorFault {
    /// Name of the failing validator.
    pub validator: &'static str,
    /// What went wrong.
    pub message: String,
}

impl ValidatorFault {
    /// Create a fault for the named validator.
    #[must_use]
    pub fn new(validator: &'static str, message: impl Into<String>) -> Self {
        Self {
            validator,
            message: message.into(),
        }
    }
}
