//! Chat layer error types.

use thiserror::Error;

/// Result type for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Errors surfaced by the chat client.
///
/// Per-token decode failures are not errors here; they become
/// [`crate::ChatEntry::Unreadable`] entries.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("crypto error: {0}")]
    Crypto(#[from] furina_crypto::CryptoError),

    #[error("transport error: {0}")]
    Transport(#[from] furina_transport::TransportError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("decode pool closed: {0}")]
    PoolClosed(#[from] tokio::sync::AcquireError),
}
