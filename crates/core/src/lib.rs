//! Core business logic for Depot, an intermediate store for user-submitted
//! file attachments.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. Every stored object is bound to a single owner identity and
//! encrypted at rest; incoming content passes a concurrent validation
//! pipeline before it is persisted.
//!
//! # Modules
//!
//! - `blobstore` - Blob-store contract, data model, and backends
//! - `crypto` - Authenticated encryption provider (AES-256-GCM)
//! - `scoped` - Ownership-scoped encrypting store decorator
//! - `validation` - Concurrent content validation pipeline
//! - `attachment` - Mediator facade used by the API layer
//! - `config` - Application configuration
//! - `error` - Domain error taxonomy

pub mod attachment;
pub mod blobstore;
pub mod config;
pub mod crypto;
pub mod error;
pub mod scoped;
pub mod validation;

pub use config::AppConfig;
pub use error::{DepotError, DepotResult};
