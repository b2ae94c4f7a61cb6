//! Ownership-scoped encrypting store decorator.
//!
//! Wraps any [`BlobStore`](crate::blobstore::BlobStore) so that every
//! operation is authorized against an owner identity and every payload is
//! encrypted at rest. Ownership is a relationship, not a registry: it is
//! re-derived on each access by opening the encrypted owner tag stored in
//! the object's metadata.

mod service;

pub use service::ScopedStore;
