//! Explicit chat state: the current paraphrase and what it decrypted.

use chrono::{DateTime, SecondsFormat, Utc};
use furina_crypto::{DecodeFailure, DecryptedMessage, ENVELOPE_VERSION};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Sender tag attached to messages sent from this client.
pub const LOCAL_SENDER: &str = "me";

/// Sender shown for messages whose envelope carries none.
pub const UNKNOWN_SENDER: &str = "other";

/// Where a message in the session came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Origin {
    /// Decoded from the fetched token list.
    Fetched,
    /// Sent from here and not yet seen in the fetched list.
    Pending { token: String },
}

/// A readable message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: String,
    pub ts: Option<String>,
    pub version: u32,
    pub origin: Origin,
}

impl ChatMessage {
    pub fn from_decrypted(msg: DecryptedMessage) -> Self {
        Self {
            text: msg.text,
            sender: msg
                .meta
                .sender
                .unwrap_or_else(|| UNKNOWN_SENDER.to_string()),
            ts: msg.meta.ts,
            version: msg.meta.version,
            origin: Origin::Fetched,
        }
    }

    /// A message just sent from this client, pending its appearance upstream.
    pub fn pending(text: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: LOCAL_SENDER.to_string(),
            ts: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            version: ENVELOPE_VERSION,
            origin: Origin::Pending {
                token: token.into(),
            },
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.ts
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn is_local(&self) -> bool {
        self.sender == LOCAL_SENDER
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.origin, Origin::Pending { .. })
    }
}

/// One slot of the fetched list, readable or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEntry {
    Message(ChatMessage),
    /// Position `index` in the fetched list could not be opened.
    Unreadable { index: usize, failure: DecodeFailure },
}

impl ChatEntry {
    pub fn as_message(&self) -> Option<&ChatMessage> {
        match self {
            Self::Message(msg) => Some(msg),
            Self::Unreadable { .. } => None,
        }
    }
}

/// Counts over the current entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub readable: usize,
    pub unreadable: usize,
}

/// What the session currently holds, for status lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing fetched or sent.
    Empty,
    /// Entries exist but none decrypted under this paraphrase.
    AllUnreadable { count: usize },
    Ready { readable: usize, unreadable: usize },
}

/// The paraphrase in use and the entries decoded with it.
///
/// Rebuilt whenever the paraphrase changes; entries decoded under one
/// paraphrase are never mixed with another's.
#[derive(Clone, Default)]
pub struct ChatSession {
    paraphrase: String,
    entries: Vec<ChatEntry>,
}

impl ChatSession {
    pub fn new(paraphrase: impl Into<String>) -> Self {
        Self {
            paraphrase: paraphrase.into(),
            entries: Vec::new(),
        }
    }

    pub fn paraphrase(&self) -> &str {
        &self.paraphrase
    }

    /// Switches paraphrase. Returns true, and drops all entries, if it changed.
    pub fn set_paraphrase(&mut self, paraphrase: impl Into<String>) -> bool {
        let paraphrase = paraphrase.into();
        if paraphrase == self.paraphrase {
            return false;
        }
        self.paraphrase = paraphrase;
        self.entries.clear();
        true
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(ChatEntry::as_message)
    }

    /// Replaces the session with freshly decoded entries.
    ///
    /// Pending local messages whose token is not in `fetched_tokens` are
    /// kept at the end; the rest have arrived upstream and are dropped.
    pub fn replace_entries(&mut self, decoded: Vec<ChatEntry>, fetched_tokens: &[String]) {
        let fetched: HashSet<&str> = fetched_tokens.iter().map(String::as_str).collect();
        let still_pending: Vec<ChatEntry> = self
            .entries
            .drain(..)
            .filter(|entry| match entry {
                ChatEntry::Message(ChatMessage {
                    origin: Origin::Pending { token },
                    ..
                }) => !fetched.contains(token.as_str()),
                _ => false,
            })
            .collect();

        self.entries = decoded;
        self.entries.extend(still_pending);
    }

    /// Appends a message sent from this client.
    pub fn push_pending(&mut self, message: ChatMessage) {
        self.entries.push(ChatEntry::Message(message));
    }

    pub fn summary(&self) -> BatchSummary {
        let readable = self.messages().count();
        BatchSummary {
            total: self.entries.len(),
            readable,
            unreadable: self.entries.len() - readable,
        }
    }

    pub fn status(&self) -> SessionStatus {
        let summary = self.summary();
        match summary {
            BatchSummary { total: 0, .. } => SessionStatus::Empty,
            BatchSummary {
                readable: 0,
                unreadable,
                ..
            } => SessionStatus::AllUnreadable { count: unreadable },
            BatchSummary {
                readable,
                unreadable,
                ..
            } => SessionStatus::Ready {
                readable,
                unreadable,
            },
        }
    }
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("paraphrase", &"[REDACTED]")
            .field("entries", &self.entries.len())
            .finish()
    }
}
