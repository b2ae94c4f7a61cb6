//! Structural sanity checks for PDF payloads.

use async_trait::async_trait;

use super::pipeline::FileValidator;
use super::types::{RejectionCategory, ValidationOutcome, ValidatorFault};

const NAME: &str = "pdf_structure";

const PDF_MAGIC: &[u8] = b"%PDF-";
const EOF_MARKER: &[u8] = b"%%EOF";
// The end-of-file marker must sit near the end; incremental updates can put
// a little data after it, so scan a bounded trailer window.
const TRAILER_WINDOW: usize = 1024;

/// Rejects PDF payloads that a downstream document pipeline could not open:
/// missing or mangled header, or no end-of-file marker. Content that is not
/// a PDF at all passes untouched.
#[derive(Debug, Default)]
pub struct PdfStructureValidator;

impl PdfStructureValidator {
    /// Create the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_pdf(filename: &str, content: &[u8]) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf") || content.starts_with(PDF_MAGIC)
}

fn has_eof_marker(content: &[u8]) -> bool {
    let start = content.len().saturating_sub(TRAILER_WINDOW);
    content[start..]
        .windows(EOF_MARKER.len())
        .any(|window| window == EOF_MARKER)
}

#[async_trait]
impl FileValidator for PdfStructureValidator {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn validate(
        &self,
        filename: &str,
        content: &[u8],
    ) -> Result<ValidationOutcome, ValidatorFault> {
        if !is_pdf(filename, content) {
            return Ok(ValidationOutcome::valid(filename));
        }

        if !content.starts_with(PDF_MAGIC) {
            return Ok(ValidationOutcome::invalid(
                filename,
                "PDF header is missing",
                RejectionCategory::MalformedDocument,
            ));
        }

        let version_ok = content
            .get(PDF_MAGIC.len())
            .is_some_and(u8::is_ascii_digit);
        if !version_ok {
            return Ok(ValidationOutcome::invalid(
                filename,
                "PDF version marker is malformed",
                RejectionCategory::MalformedDocument,
            ));
        }

        if !has_eof_marker(content) {
            return Ok(ValidationOutcome::invalid(
                filename,
                "PDF end-of-file marker is missing",
                RejectionCategory::MalformedDocument,
            ));
        }

        Ok(ValidationOutcome::valid(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\ntrailer\n<<>>\n%%EOF\n";

    #[tokio::test]
    async fn test_accepts_minimal_pdf() {
        let outcome = PdfStructureValidator::new()
            .validate("doc.pdf", MINIMAL_PDF)
            .await
            .unwrap();
        assert!(outcome.is_valid());
    }

    #[tokio::test]
    async fn test_ignores_non_pdf_content() {
        let outcome = PdfStructureValidator::new()
            .validate("photo.png", b"\x89PNG\r\n\x1a\nrest")
            .await
            .unwrap();
        assert!(outcome.is_valid());
    }

    #[tokio::test]
    async fn test_rejects_pdf_without_header() {
        let outcome = PdfStructureValidator::new()
            .validate("doc.pdf", b"not a pdf at all")
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            ValidationOutcome::Invalid {
                category: RejectionCategory::MalformedDocument,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_rejects_truncated_pdf() {
        let truncated = &MINIMAL_PDF[..MINIMAL_PDF.len() - 8];
        let outcome = PdfStructureValidator::new()
            .validate("doc.pdf", truncated)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            ValidationOutcome::Invalid {
                category: RejectionCategory::MalformedDocument,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_rejects_mangled_version() {
        let outcome = PdfStructureValidator::new()
            .validate("doc.pdf", b"%PDF-x.4\n%%EOF")
            .await
            .unwrap();
        assert!(!outcome.is_valid());
    }
}
