//! Chat client: ties the codec, a transport, and the session together.

use crate::decode::{decode_batch_async, seal_async};
use crate::error::ChatResult;
use crate::session::{BatchSummary, ChatMessage, ChatSession, LOCAL_SENDER};
use furina_crypto::EnvelopeCodec;
use furina_transport::MessageTransport;
use std::sync::Arc;
use tracing::{debug, info};

/// Sends and refreshes messages for one paraphrase at a time.
pub struct ChatClient {
    codec: EnvelopeCodec,
    transport: Arc<dyn MessageTransport>,
    session: ChatSession,
}

impl ChatClient {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        codec: EnvelopeCodec,
        paraphrase: impl Into<String>,
    ) -> Self {
        Self {
            codec,
            transport,
            session: ChatSession::new(paraphrase),
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Fetches the token list and rebuilds the session from it.
    ///
    /// On transport failure the session is left untouched.
    pub async fn refresh(&mut self) -> ChatResult<BatchSummary> {
        let tokens = self.transport.fetch_tokens().await?;
        debug!("decoding {} tokens", tokens.len());

        let entries = decode_batch_async(
            self.codec,
            tokens.clone(),
            self.session.paraphrase().to_string(),
        )
        .await?;
        self.session.replace_entries(entries, &tokens);

        let summary = self.session.summary();
        info!(
            "refreshed: {} entries, {} readable, {} unreadable",
            summary.total, summary.readable, summary.unreadable
        );
        Ok(summary)
    }

    /// Seals and submits `text` as this client's message.
    ///
    /// Surrounding whitespace is trimmed; blank input sends nothing and
    /// returns `None`. On success the message is shown locally right away
    /// and the submitted token is returned.
    pub async fn send(&mut self, text: &str) -> ChatResult<Option<String>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let token = seal_async(
            self.codec,
            text.to_string(),
            self.session.paraphrase().to_string(),
            Some(LOCAL_SENDER.to_string()),
        )
        .await?;
        self.transport.submit_token(&token).await?;

        self.session.push_pending(ChatMessage::pending(text, token.clone()));
        Ok(Some(token))
    }

    /// Switches paraphrase and rebuilds the session under it.
    pub async fn set_paraphrase(
        &mut self,
        paraphrase: impl Into<String>,
    ) -> ChatResult<BatchSummary> {
        if self.session.set_paraphrase(paraphrase) {
            info!("paraphrase changed, rebuilding session");
        }
        self.refresh().await
    }
}
