//! Attachment mediation.
//!
//! [`AttachmentService`] is the single entry point the API layer talks to:
//! it derives storage keys, runs the validation pipeline, delegates to the
//! ownership-scoped store and keeps the error taxonomy closed regardless of
//! which blob-store backend is plugged in.

mod service;
mod types;

pub use service::AttachmentService;
pub use types::StoreAttachmentInput;
