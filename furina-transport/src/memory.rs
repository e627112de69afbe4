//! In-process transport for tests and offline use.

use crate::error::TransportResult;
use crate::transport::MessageTransport;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Append-only token list held in memory. Clones share the same list.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    tokens: Arc<RwLock<Vec<String>>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport pre-populated with `tokens`, in order.
    pub fn with_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: Arc::new(RwLock::new(tokens.into_iter().map(Into::into).collect())),
        }
    }

    /// Snapshot of the current list.
    pub async fn tokens(&self) -> Vec<String> {
        self.tokens.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl MessageTransport for InMemoryTransport {
    async fn fetch_tokens(&self) -> TransportResult<Vec<String>> {
        Ok(self.tokens().await)
    }

    async fn submit_token(&self, token: &str) -> TransportResult<()> {
        self.tokens.write().await.push(token.to_string());
        Ok(())
    }
}
