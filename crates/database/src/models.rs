//! Database models.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Conversation status while the bot is still gathering requirements.
pub const STATUS_PENDING: &str = "pending";
/// Conversation status once the client has signed off on the project.
pub const STATUS_FINALIZED: &str = "finalized";
/// Initial status of a support ticket.
pub const TICKET_OPEN: &str = "open";

/// Current UTC time as an ISO-8601 string with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A web chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: String,
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

/// Contact form submission, as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// "pricing", "demo" or "services"
    pub request_type: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// A stored sales lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub request_type: String,
    pub message: Option<String>,
    pub timestamp: String,
}

/// Support ticket submission, as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSupportTicket {
    pub email: String,
    /// "login", "technical", "billing" or "general"
    pub issue_type: String,
    pub description: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A stored support ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SupportTicket {
    pub id: String,
    pub email: String,
    pub issue_type: String,
    pub description: String,
    /// "open", "in_progress" or "resolved"
    pub status: String,
    pub phone: Option<String>,
    pub timestamp: String,
}

/// One turn of a WhatsApp conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ConversationMessage {
    /// "client" or "assistant"
    pub role: String,
    pub message: String,
    pub timestamp: String,
}

impl ConversationMessage {
    pub const CLIENT: &'static str = "client";
    pub const ASSISTANT: &'static str = "assistant";

    /// A message stamped with the current time.
    pub fn now(role: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            message: message.into(),
            timestamp: now_timestamp(),
        }
    }

    pub fn is_client(&self) -> bool {
        self.role == Self::CLIENT
    }
}

/// A WhatsApp conversation, keyed by the client's E.164 phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub phone_number: String,
    /// Unset until the bot asks; "Unknown" while waiting for the answer.
    pub client_name: Option<String>,
    pub status: String,
    pub messages_used: i64,
    pub created_at: String,
    pub updated_at: String,
    /// Messages, oldest first. Loaded separately from the row.
    #[sqlx(skip)]
    #[serde(rename = "conversation")]
    pub messages: Vec<ConversationMessage>,
}

impl Conversation {
    /// Append a client message and count it against the limit.
    pub fn push_client(&mut self, text: impl Into<String>) {
        self.messages
            .push(ConversationMessage::now(ConversationMessage::CLIENT, text));
        self.messages_used += 1;
    }

    /// Append an assistant message.
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages
            .push(ConversationMessage::now(ConversationMessage::ASSISTANT, text));
    }

    pub fn is_finalized(&self) -> bool {
        self.status == STATUS_FINALIZED
    }
}
