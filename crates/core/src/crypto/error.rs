//! Crypto error types.

use thiserror::Error;

/// Crypto operation errors.
///
/// Decryption failures are a single opaque variant: an authentication-tag
/// mismatch, malformed input and a wrong key are indistinguishable to the
/// caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Decryption or authentication failed.
    #[error("decryption failed")]
    DecryptionFailure,

    /// Encryption failed.
    #[error("encryption failed")]
    EncryptionFailure,

    /// Key material is invalid.
    #[error("invalid key material: {0}")]
    Configuration(String),
}

impl CryptoError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
