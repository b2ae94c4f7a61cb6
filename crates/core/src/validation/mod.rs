//! Concurrent content validation.
//!
//! Incoming files are checked by a set of independent validators before they
//! are persisted. Validators run concurrently (fan-out) and the pipeline
//! waits for all of them (fan-in); every rejection is reported, not just the
//! first. A validator that fails to execute at all is a fatal pipeline
//! error, distinct from a rejection verdict.
//!
//! Shipped validators:
//!
//! - [`FileTypeValidator`] - allowlist plus magic-byte sniffing
//! - [`FileSizeValidator`] - byte-size ceiling
//! - [`PdfStructureValidator`] - structural sanity of PDF payloads
//! - [`VirusScanValidator`] - remote malware scan over HTTP

mod content_type;
mod error;
mod pdf;
mod pipeline;
mod size;
mod types;
mod virus;

pub use content_type::{FileKind, FileTypeValidator};
pub use error::ValidationError;
pub use pdf::PdfStructureValidator;
pub use pipeline::{FileValidator, ValidationPipeline};
pub use size::FileSizeValidator;
pub use types::{RejectionCategory, ValidationOutcome, ValidatorFault};
pub use virus::VirusScanValidator;
