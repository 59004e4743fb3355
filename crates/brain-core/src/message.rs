//! Message types passed into and out of a [`Brain`](crate::Brain).

use serde::{Deserialize, Serialize};

/// A prior conversation turn given to the model as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    /// Role: "system", "user" or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl HistoryMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// A customer message to be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Who sent it: a phone number for WhatsApp, `"web"` for the chat widget.
    pub sender: String,
    /// The message text.
    pub text: String,
    /// Unix timestamp (seconds) reported by the channel, 0 if unknown.
    pub timestamp: u64,
    /// Earlier turns of the same conversation, oldest first.
    pub history: Vec<HistoryMessage>,
}

impl InboundMessage {
    /// Create a message with no prior history.
    pub fn direct(sender: impl Into<String>, text: impl Into<String>, timestamp: u64) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp,
            history: Vec::new(),
        }
    }

    /// Attach prior conversation turns.
    pub fn with_history(mut self, history: Vec<HistoryMessage>) -> Self {
        self.history = history;
        self
    }
}

/// A reply produced by a brain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Who the reply is addressed to.
    pub recipient: String,
    /// Reply text.
    pub text: String,
}

impl OutboundMessage {
    /// Create a reply to an inbound message.
    pub fn reply_to(message: &InboundMessage, text: impl Into<String>) -> Self {
        Self {
            recipient: message.sender.clone(),
            text: text.into(),
        }
    }
}
