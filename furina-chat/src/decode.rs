//! Batch decoding of fetched tokens.
//!
//! Each token is opened independently. A malformed or unauthenticated token
//! becomes an `Unreadable` entry at its position; it never stops the batch.
//! Key derivation is CPU-bound, so the async variants run it on tokio's
//! blocking pool.

use crate::error::ChatResult;
use crate::session::{ChatEntry, ChatMessage};
use furina_crypto::EnvelopeCodec;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Opens every token under `paraphrase`, preserving order.
pub fn decode_batch(codec: &EnvelopeCodec, tokens: &[String], paraphrase: &str) -> Vec<ChatEntry> {
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| decode_one(codec, index, token, paraphrase))
        .collect()
}

fn decode_one(codec: &EnvelopeCodec, index: usize, token: &str, paraphrase: &str) -> ChatEntry {
    match codec.open(token, paraphrase) {
        Ok(msg) => ChatEntry::Message(ChatMessage::from_decrypted(msg)),
        Err(failure) => {
            debug!("entry #{index} unreadable: {failure}");
            ChatEntry::Unreadable { index, failure }
        }
    }
}

/// Blocking-pool slots a batch occupies at once by default: one per core.
pub fn default_decode_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Like [`decode_batch`], on tokio's blocking pool.
///
/// Runs at most [`default_decode_parallelism`] derivations at a time so a
/// long list never crowds out other blocking work.
pub async fn decode_batch_async(
    codec: EnvelopeCodec,
    tokens: Vec<String>,
    paraphrase: String,
) -> ChatResult<Vec<ChatEntry>> {
    decode_batch_bounded(codec, tokens, paraphrase, default_decode_parallelism()).await
}

/// Decodes with at most `limit` blocking tasks in flight.
///
/// Tokens have independent salts, so their derivations run in parallel;
/// results are collected back in input order.
pub async fn decode_batch_bounded(
    codec: EnvelopeCodec,
    tokens: Vec<String>,
    paraphrase: String,
    limit: usize,
) -> ChatResult<Vec<ChatEntry>> {
    let slots = Arc::new(Semaphore::new(limit.max(1)));
    let paraphrase: Arc<str> = paraphrase.into();

    let mut handles = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.into_iter().enumerate() {
        let permit = Arc::clone(&slots).acquire_owned().await?;
        let paraphrase = Arc::clone(&paraphrase);
        handles.push(tokio::task::spawn_blocking(move || {
            let entry = decode_one(&codec, index, &token, &paraphrase);
            drop(permit);
            entry
        }));
    }

    let mut entries = Vec::with_capacity(handles.len());
    for handle in handles {
        entries.push(handle.await?);
    }
    Ok(entries)
}

/// Seals on the blocking pool.
pub async fn seal_async(
    codec: EnvelopeCodec,
    plaintext: String,
    paraphrase: String,
    sender: Option<String>,
) -> ChatResult<String> {
    let token = tokio::task::spawn_blocking(move || {
        codec.seal(&plaintext, &paraphrase, sender.as_deref())
    })
    .await??;
    Ok(token)
}
