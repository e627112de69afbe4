//! Encryption layer for Furina.
//!
//! Turns a chat message plus a shared paraphrase into a self-contained
//! token that can travel through an untrusted channel:
//! - PBKDF2-HMAC-SHA256 for key derivation from the paraphrase
//! - AES-256-GCM for authenticated encryption
//! - Double base64 encoding so the token is one transport-safe string
//!
//! # Statelessness
//!
//! Nothing is cached between calls. Each seal draws a new salt and IV and
//! derives a new key; each open derives the key from the envelope's own
//! salt. Derived keys are zeroized when dropped, before the call returns.
//!
//! Opening never panics on untrusted input. Wrong paraphrases and tampered
//! tokens both yield [`DecodeFailure::AuthenticationFailed`].

mod cipher;
pub mod envelope;
mod error;
mod key;

pub use cipher::{IV_SIZE, Iv, TAG_SIZE, decrypt, encrypt};
pub use envelope::{
    DecryptedMessage, ENVELOPE_VERSION, Envelope, EnvelopeCodec, MessageMeta, open, seal,
};
pub use error::{CryptoError, CryptoResult, DecodeFailure};
pub use key::{
    DEFAULT_PBKDF2_ITERATIONS, DerivedKey, KEY_SIZE, KdfParams, SALT_SIZE, Salt, derive_key,
};
