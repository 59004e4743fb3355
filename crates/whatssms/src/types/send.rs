//! Types for sending messages.

use serde::{Deserialize, Serialize};

/// Form fields for `POST /send/whatsapp`.
#[derive(Debug, Clone, Serialize)]
pub struct SendForm<'a> {
    pub secret: &'a str,
    pub account: &'a str,
    pub recipient: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub message: &'a str,
}

impl<'a> SendForm<'a> {
    /// A plain text message.
    pub fn text(secret: &'a str, account: &'a str, recipient: &'a str, message: &'a str) -> Self {
        Self {
            secret,
            account,
            recipient,
            kind: "text",
            message,
        }
    }
}

/// JSON body returned by the gateway.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendResponse {
    /// Gateway status code; only the integer `200` means accepted.
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl SendResponse {
    pub fn is_accepted(&self) -> bool {
        matches!(&self.status, Some(serde_json::Value::Number(n)) if n.as_i64() == Some(200))
    }
}


/// Confirmation that the gateway accepted a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Normalised recipient the message went to.
    pub recipient: String,
    /// Gateway's message text, if any.
    pub detail: Option<String>,
}
