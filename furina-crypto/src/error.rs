//! Error types for envelope sealing and opening.

use thiserror::Error;

/// Result type for operations that can fail while producing envelopes.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Why a token could not be opened.
///
/// Wrong paraphrase and tampered data both surface as
/// [`DecodeFailure::AuthenticationFailed`]; the codec never reports which
/// one occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    /// Not base64, not a structured envelope, missing fields, bad lengths,
    /// or an unsupported version. The detail is for logs, not for users.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("authentication failed (wrong paraphrase or tampered data)")]
    AuthenticationFailed,
}

impl DecodeFailure {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedToken(detail.into())
    }

    /// Returns true for structural failures, false for authentication failures.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedToken(_))
    }
}

/// Errors raised by key derivation and sealing.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("secure random source unavailable: {0}")]
    Random(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Decode(#[from] DecodeFailure),
}
