//! AES-256-GCM content cipher.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::config::CryptoConfig;

use super::error::CryptoError;

/// Master key length in bytes.
pub const KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Authenticated encryption provider.
///
/// Wraps AES-256-GCM with a caller-supplied associated-data parameter. The
/// random nonce is prepended to the ciphertext. Built once at process start
/// from configured key material and shared by reference.
pub struct ContentCipher {
    cipher: Aes256Gcm,
}

impl ContentCipher {
    /// Create a cipher from raw key material.
    #[must_use]
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: Aes256Gcm::new(&Key::<Aes256Gcm>::from(*key)),
        }
    }

    /// Create a cipher from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured master key is not valid base64 or
    /// not exactly 32 bytes.
    pub fn from_config(config: &CryptoConfig) -> Result<Self, CryptoError> {
        let raw = BASE64
            .decode(&config.master_key)
            .map_err(|_| CryptoError::configuration("master key is not valid base64"))?;
        let key: [u8; KEY_LEN] = raw
            .try_into()
            .map_err(|_| CryptoError::configuration("master key must be 32 bytes"))?;
        Ok(Self::new(&key))
    }

    /// Encrypt `plaintext`, binding `associated_data` into the
    /// authentication tag. Returns `nonce || ciphertext`.
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext,
                    aad: associated_data,
                },
            )
            .map_err(|_| CryptoError::EncryptionFailure)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(nonce.as_slice());
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Decrypt a `nonce || ciphertext` envelope produced by [`encrypt`].
    /// Fails unless `associated_data` matches what was bound at encryption
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::DecryptionFailure`] on any mismatch or
    /// malformed input, without further detail.
    ///
    /// [`encrypt`]: Self::encrypt
    pub fn decrypt(&self, sealed: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::DecryptionFailure);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);

        self.cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: associated_data,
                },
            )
            .map_err(|_| CryptoError::DecryptionFailure)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Property: decrypt(encrypt(p, ad), ad) == p for arbitrary payloads and
    // owner identities.
    proptest! {
        #[test]
        fn prop_roundtrip(
            plaintext in proptest::collection::vec(any::<u8>(), 0..512),
            owner in "[a-zA-Z0-9]{1,32}",
        ) {
            let cipher = ContentCipher::new(&[3u8; KEY_LEN]);
            let sealed = cipher.encrypt(&plaintext, owner.as_bytes()).unwrap();
            let opened = cipher.decrypt(&sealed, owner.as_bytes()).unwrap();
            prop_assert_eq!(opened, plaintext);
        }
    }

    // Property: a ciphertext never opens under a different associated-data
    // value.
    proptest! {
        #[test]
        fn prop_wrong_associated_data_never_opens(
            plaintext in proptest::collection::vec(any::<u8>(), 0..512),
            owner_a in "[a-z0-9]{1,16}",
            owner_b in "[a-z0-9]{1,16}",
        ) {
            prop_assume!(owner_a != owner_b);
            let cipher = ContentCipher::new(&[3u8; KEY_LEN]);
            let sealed = cipher.encrypt(&plaintext, owner_a.as_bytes()).unwrap();
            prop_assert!(cipher.decrypt(&sealed, owner_b.as_bytes()).is_err());
        }
    }
}
