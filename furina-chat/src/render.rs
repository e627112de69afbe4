//! Plain-text rendering of a session.

use crate::session::{ChatEntry, ChatSession, SessionStatus};
use chrono::{Local, TimeZone};

/// Shown when the session has no entries at all.
pub const EMPTY_PLACEHOLDER: &str = "No messages yet.";

/// Which side of the conversation a line belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Sent,
    Received,
    /// Could not be decrypted; sender unknown.
    Unknown,
    /// Status text rather than a message.
    Placeholder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedLine {
    pub side: Side,
    pub text: String,
}

/// Renders one entry with times shown in `tz`.
pub fn render_entry_in<Tz: TimeZone>(entry: &ChatEntry, tz: &Tz) -> RenderedLine
where
    Tz::Offset: std::fmt::Display,
{
    match entry {
        ChatEntry::Message(msg) => {
            let time = msg
                .timestamp()
                .map(|ts| ts.with_timezone(tz).format("%H:%M:%S").to_string())
                .unwrap_or_default();
            RenderedLine {
                side: if msg.is_local() { Side::Sent } else { Side::Received },
                text: format!("[{time}] {}", msg.text),
            }
        }
        ChatEntry::Unreadable { index, .. } => RenderedLine {
            side: Side::Unknown,
            text: format!("[unreadable entry #{index}]"),
        },
    }
}

/// Renders one entry in the local time zone.
pub fn render_entry(entry: &ChatEntry) -> RenderedLine {
    render_entry_in(entry, &Local)
}

/// Renders the whole session, or the placeholder when it is empty.
pub fn render_session_in<Tz: TimeZone>(session: &ChatSession, tz: &Tz) -> Vec<RenderedLine>
where
    Tz::Offset: std::fmt::Display,
{
    if session.status() == SessionStatus::Empty {
        return vec![RenderedLine {
            side: Side::Placeholder,
            text: EMPTY_PLACEHOLDER.to_string(),
        }];
    }
    session
        .entries()
        .iter()
        .map(|entry| render_entry_in(entry, tz))
        .collect()
}

pub fn render_session(session: &ChatSession) -> Vec<RenderedLine> {
    render_session_in(session, &Local)
}

/// One-line status, e.g. for a header.
pub fn status_line(session: &ChatSession) -> String {
    match session.status() {
        SessionStatus::Empty => "no messages".to_string(),
        SessionStatus::AllUnreadable { count } => {
            format!("{count} messages, none readable with this paraphrase")
        }
        SessionStatus::Ready {
            readable,
            unreadable: 0,
        } => format!("{readable} messages"),
        SessionStatus::Ready {
            readable,
            unreadable,
        } => format!("{readable} messages, {unreadable} unreadable"),
    }
}
