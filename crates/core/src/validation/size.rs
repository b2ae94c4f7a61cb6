//! File-size validation.

use async_trait::async_trait;

use super::pipeline::FileValidator;
use super::types::{RejectionCategory, ValidationOutcome, ValidatorFault};

const NAME: &str = "file_size";

/// Rejects files larger than the configured ceiling.
pub struct FileSizeValidator {
    max_bytes: u64,
}

impl FileSizeValidator {
    /// Create a validator with the given ceiling in bytes.
    #[must_use]
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

#[async_trait]
impl FileValidator for FileSizeValidator {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn validate(
        &self,
        filename: &str,
        content: &[u8],
    ) -> Result<ValidationOutcome, ValidatorFault> {
        let size = u64::try_from(content.len()).unwrap_or(u64::MAX);
        if size > self.max_bytes {
            return Ok(ValidationOutcome::invalid(
                filename,
                format!(
                    "file size {size} bytes exceeds maximum allowed {} bytes",
                    self.max_bytes
                ),
                RejectionCategory::FileTooLarge,
            ));
        }
        Ok(ValidationOutcome::valid(filename))
    }
}
