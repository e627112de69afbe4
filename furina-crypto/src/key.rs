//! Paraphrase-based key derivation (PBKDF2-HMAC-SHA256).

use crate::error::{CryptoError, CryptoResult};
use rand::TryRngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a derived AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the per-message PBKDF2 salt in bytes.
pub const SALT_SIZE: usize = 16;

/// PBKDF2 iteration count used when both ends have not agreed on another.
///
/// Not stored in the envelope: sender and receiver must use the same value.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 250_000;

/// Tunable key-derivation cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdfParams {
    pub iterations: u32,
}

impl KdfParams {
    pub const fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

/// Fresh random salt, one per sealed message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Draws a salt from the operating system CSPRNG.
    pub fn random() -> CryptoResult<Self> {
        let mut bytes = [0u8; SALT_SIZE];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::Random(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// 256-bit key derived from a paraphrase. Wiped from memory on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    /// Wraps raw key bytes (e.g. a test vector key).
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derives the AES-256 key for `paraphrase` under `salt`.
///
/// CPU-bound by design; async callers should run it on a blocking thread.
pub fn derive_key(paraphrase: &str, salt: &Salt, params: &KdfParams) -> CryptoResult<DerivedKey> {
    if params.iterations == 0 {
        return Err(CryptoError::KeyDerivation(
            "iteration count must be at least 1".to_string(),
        ));
    }

    let mut key = DerivedKey([0u8; KEY_SIZE]);
    pbkdf2::pbkdf2_hmac::<Sha256>(
        paraphrase.as_bytes(),
        salt.as_bytes(),
        params.iterations,
        &mut key.0,
    );
    Ok(key)
}
