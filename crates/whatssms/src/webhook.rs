//! Decoding inbound webhook deliveries.
//!
//! The gateway posts either JSON or form-encoded bodies, in three shapes:
//!
//! 1. `{"type": "whatsapp", "data": {...}}` (JSON, or a form whose `data`
//!    field holds a JSON string)
//! 2. flat form fields: `type`, `phone`, `message`, `id`, `timestamp`
//! 3. bracketed form fields: `type`, `data[phone]`, `data[message]`, ...

use serde_json::{Map, Value};

use crate::error::WebhookError;
use crate::phone::normalize_to_e164;

/// Decoded webhook body as a flat JSON object.
pub type WebhookBody = Map<String, Value>;

/// Parse a raw webhook body.
///
/// JSON is used when the content type says so, form decoding when it says
/// `application/x-www-form-urlencoded`. Otherwise JSON is tried first and
/// the body falls back to form decoding.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<WebhookBody, WebhookError> {
    let content_type = content_type.unwrap_or_default();

    if content_type.contains("application/json") {
        return parse_json(body);
    }
    if content_type.contains("application/x-www-form-urlencoded") {
        return Ok(parse_form(body));
    }

    match parse_json(body) {
        Ok(map) => Ok(map),
        Err(_) => Ok(parse_form(body)),
    }
}

fn parse_json(body: &[u8]) -> Result<WebhookBody, WebhookError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        other => Err(WebhookError::Unsupported(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

fn parse_form(body: &[u8]) -> WebhookBody {
    let mut map: WebhookBody = url::form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();

    // `data` sometimes arrives as an embedded JSON document.
    let embedded = match map.get("data") {
        Some(Value::String(raw)) => serde_json::from_str::<Value>(raw).ok(),
        _ => None,
    };
    if let Some(value) = embedded {
        map.insert("data".to_string(), value);
    }

    map
}

/// A message extracted from a webhook body.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    /// Channel type, e.g. "whatsapp" or "sms".
    pub channel: String,
    pub message_id: String,
    /// Sender exactly as the gateway sent it.
    pub sender_raw: String,
    /// Sender normalised to E.164; empty when the payload had none.
    pub sender: String,
    pub message: String,
    pub timestamp: String,
    /// The bot account the message was delivered to.
    pub bot_account: String,
}

impl WebhookEvent {
    /// Extract an event from a decoded body.
    ///
    /// Returns `None` when the body matches none of the known shapes.
    pub fn from_body(body: &WebhookBody) -> Option<Self> {
        let channel = text(body.get("type")?);

        let data: WebhookBody = if let Some(Value::Object(nested)) = body.get("data") {
            nested.clone()
        } else if body.contains_key("phone") {
            ["phone", "message", "id", "timestamp"]
                .iter()
                .filter_map(|key| body.get(*key).map(|v| (key.to_string(), v.clone())))
                .collect()
        } else if body.keys().any(|k| k.starts_with("data[")) {
            body.iter()
                .filter_map(|(k, v)| {
                    k.strip_prefix("data[")
                        .and_then(|rest| rest.strip_suffix(']'))
                        .map(|field| (field.to_string(), v.clone()))
                })
                .collect()
        } else {
            return None;
        };

        let field = |name: &str| data.get(name).map(text).unwrap_or_default();

        let account_field = match channel.as_str() {
            "whatsapp" => "wid",
            "sms" => "device",
            _ => "account",
        };

        let sender_raw = field("phone");
        let message_id = match field("id") {
            id if id.is_empty() => "unknown".to_string(),
            id => id,
        };
        let timestamp = match field("timestamp") {
            ts if ts.is_empty() => "0".to_string(),
            ts => ts,
        };

        Some(Self {
            sender: normalize_to_e164(&sender_raw),
            sender_raw,
            message: field("message"),
            message_id,
            timestamp,
            bot_account: field(account_field),
            channel,
        })
    }
}

/// The shared secret carried in a body, if any.
pub fn body_secret(body: &WebhookBody) -> Option<String> {
    body.get("secret")
        .map(text)
        .filter(|secret| !secret.is_empty())
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
