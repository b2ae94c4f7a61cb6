//! File-type validation: extension allowlist plus magic-byte sniffing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::pipeline::FileValidator;
use super::types::{RejectionCategory, ValidationOutcome, ValidatorFault};

const NAME: &str = "file_type";

/// File kinds the depot knows how to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// PDF document.
    Pdf,
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
}

impl FileKind {
    /// Filename extensions mapped to this kind.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Png => &["png"],
            Self::Jpeg => &["jpg", "jpeg"],
        }
    }

    /// Resolve a kind from a lowercase filename extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Whether `content` starts with this kind's magic bytes.
    #[must_use]
    pub fn matches_magic(self, content: &[u8]) -> bool {
        match self {
            Self::Pdf => content.starts_with(b"%PDF-"),
            Self::Png => content.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]),
            Self::Jpeg => content.starts_with(&[0xff, 0xd8, 0xff]),
        }
    }
}

/// Rejects files whose type is not in the accepted set, or whose content
/// does not match what the filename claims.
pub struct FileTypeValidator {
    allowed: Vec<FileKind>,
}

impl FileTypeValidator {
    /// Create a validator accepting the given kinds.
    #[must_use]
    pub fn new(allowed: Vec<FileKind>) -> Self {
        Self { allowed }
    }
}

fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

#[async_trait]
impl FileValidator for FileTypeValidator {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn validate(
        &self,
        filename: &str,
        content: &[u8],
    ) -> Result<ValidationOutcome, ValidatorFault> {
        let Some(ext) = extension(filename) else {
            return Ok(ValidationOutcome::invalid(
                filename,
                "filename has no extension",
                RejectionCategory::UnsupportedType,
            ));
        };

        let Some(kind) = FileKind::from_extension(&ext) else {
            return Ok(ValidationOutcome::invalid(
                filename,
                format!("file type '{ext}' is not supported"),
                RejectionCategory::UnsupportedType,
            ));
        };

        if !self.allowed.contains(&kind) {
            return Ok(ValidationOutcome::invalid(
                filename,
                format!("file type '{ext}' is not allowed"),
                RejectionCategory::UnsupportedType,
            ));
        }

        if !kind.matches_magic(content) {
            return Ok(ValidationOutcome::invalid(
                filename,
                "content does not match its file extension",
                RejectionCategory::UnsupportedType,
            ));
        }

        Ok(ValidationOutcome::valid(filename))
    }
}
