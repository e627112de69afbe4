//! AES-256-GCM with a caller-supplied 96-bit nonce.

use crate::error::{CryptoError, CryptoResult, DecodeFailure};
use crate::key::DerivedKey;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::TryRngCore;
use rand::rngs::OsRng;

/// AES-GCM nonce size in bytes.
pub const IV_SIZE: usize = 12;

/// GCM authentication tag size in bytes, appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// Per-message AES-GCM nonce. Never reused under the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Iv([u8; IV_SIZE]);

impl Iv {
    /// Draws a nonce from the operating system CSPRNG.
    pub fn random() -> CryptoResult<Self> {
        let mut bytes = [0u8; IV_SIZE];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::Random(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; IV_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; IV_SIZE] {
        &self.0
    }
}

fn cipher_for(key: &DerivedKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Encrypts `plaintext`, returning ciphertext with the 16-byte tag appended.
pub fn encrypt(key: &DerivedKey, iv: &Iv, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    cipher_for(key)
        .encrypt(Nonce::from_slice(iv.as_bytes()), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))
}

/// Verifies the tag and decrypts. Any mismatch is an authentication failure.
pub fn decrypt(key: &DerivedKey, iv: &Iv, ciphertext: &[u8]) -> Result<Vec<u8>, DecodeFailure> {
    cipher_for(key)
        .decrypt(Nonce::from_slice(iv.as_bytes()), ciphertext)
        .map_err(|_| DecodeFailure::AuthenticationFailed)
}
