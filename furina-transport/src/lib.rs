//! Token transport for Furina.
//!
//! The crypto layer produces opaque tokens; this crate moves them:
//! - `MessageTransport`: fetch the ordered token list, submit one token
//! - `GitHubTransport`: raw `messages.json` reads plus `repository_dispatch` appends
//! - `InMemoryTransport`: shared in-process list for tests and offline runs

pub mod config;
pub mod error;
pub mod github;
pub mod memory;
pub mod transport;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use github::GitHubTransport;
pub use memory::InMemoryTransport;
pub use transport::MessageTransport;
