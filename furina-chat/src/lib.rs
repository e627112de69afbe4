//! Encrypted chat over an append-only token list.
//!
//! All state lives in an explicit [`ChatSession`] (paraphrase plus decoded
//! entries) owned by a [`ChatClient`]:
//! - `refresh` fetches tokens and rebuilds the session
//! - `send` seals, submits, and shows the message locally
//! - `set_paraphrase` swaps the paraphrase and rebuilds
//!
//! Tokens that fail to open are kept as `Unreadable` entries so callers can
//! tell "no messages" apart from "messages we cannot read".

pub mod client;
pub mod decode;
pub mod error;
pub mod render;
pub mod session;

pub use client::ChatClient;
pub use decode::{
    decode_batch, decode_batch_async, decode_batch_bounded, default_decode_parallelism, seal_async,
};
pub use error::{ChatError, ChatResult};
pub use render::{RenderedLine, Side, render_entry, render_session, status_line};
pub use session::{
    BatchSummary, ChatEntry, ChatMessage, ChatSession, LOCAL_SENDER, Origin, SessionStatus,
};
