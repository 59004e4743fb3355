//! Chat messages as the client sees them.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// First message of every fresh session.
pub const WELCOME_TEXT: &str = "Hello! 👋 Welcome to Vertex AI Tech. How can I help you today?";

/// Shown in place of a reply when the chat request fails.
pub const FALLBACK_TEXT: &str =
    "Sorry, I'm having trouble connecting right now. Please try again in a moment.";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One message in a chat surface. Stored as `{"sender", "text", "time"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// Display time, e.g. "14:05".
    pub time: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            time: display_time(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            time: display_time(),
        }
    }

    pub fn welcome() -> Self {
        Self::bot(WELCOME_TEXT)
    }

    pub fn fallback() -> Self {
        Self::bot(FALLBACK_TEXT)
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Build a message from a relay history entry.
    ///
    /// Role "user" maps to the user; anything else is the bot. RFC 3339
    /// timestamps are shown as local clock time, other values verbatim.
    pub fn from_history(role: &str, content: &str, timestamp: &str) -> Self {
        let sender = if role == "user" { Sender::User } else { Sender::Bot };
        let time = DateTime::parse_from_rfc3339(timestamp)
            .map(|ts| ts.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_else(|_| timestamp.to_string());

        Self {
            sender,
            text: content.to_string(),
            time,
        }
    }
}

/// Current local time as shown on a bubble.
pub fn display_time() -> String {
    Local::now().format("%H:%M").to_string()
}
