//! Authenticated encryption provider.
//!
//! Supplies the AEAD primitive used both to encrypt object content and to
//! seal the owner tag stored in object metadata. The owner identity string
//! is always bound in as associated data, so a ciphertext only opens for the
//! identity it was written for.

mod error;
mod service;

pub use error::CryptoError;
pub use service::{ContentCipher, KEY_LEN};
