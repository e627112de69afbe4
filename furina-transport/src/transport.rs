//! The append-only token list abstraction.

use crate::error::TransportResult;
use async_trait::async_trait;
use std::sync::Arc;

/// An ordered, append-only list of opaque tokens.
///
/// Order is whatever the backing store returns; it is not guaranteed to be
/// chronological. Implementations never inspect token contents.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Returns every token currently in the list.
    async fn fetch_tokens(&self) -> TransportResult<Vec<String>>;

    /// Requests that `token` be appended to the list.
    ///
    /// Success means the request was accepted, not that the token is
    /// already visible to `fetch_tokens`.
    async fn submit_token(&self, token: &str) -> TransportResult<()>;
}

#[async_trait]
impl<T: MessageTransport + ?Sized> MessageTransport for Arc<T> {
    async fn fetch_tokens(&self) -> TransportResult<Vec<String>> {
        (**self).fetch_tokens().await
    }

    async fn submit_token(&self, token: &str) -> TransportResult<()> {
        (**self).submit_token(token).await
    }
}
