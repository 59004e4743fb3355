//! WhatsApp endpoints used by the chat widget.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::conversation;
use database::models::ConversationMessage;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use whatssms::normalize_to_e164;

use crate::error::{RelayError, Result};
use crate::state::AppState;

/// One message in the widget's history view.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    /// "user" for the client, "assistant" for the bot.
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

impl From<ConversationMessage> for HistoryEntry {
    fn from(msg: ConversationMessage) -> Self {
        let role = if msg.is_client() { "user" } else { "assistant" };
        Self {
            role: role.to_string(),
            content: msg.message,
            timestamp: msg.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryEntry>,
}

/// Conversation history for a phone number; empty if none exists.
pub async fn history(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<HistoryResponse>> {
    let phone = normalize_to_e164(&phone);
    if phone.is_empty() {
        return Err(RelayError::BadRequest("phone_number is required".to_string()));
    }

    let messages = conversation::get_conversation(state.db.pool(), &phone)
        .await?
        .map(|c| c.messages.into_iter().map(HistoryEntry::from).collect())
        .unwrap_or_default();

    Ok(Json(HistoryResponse { messages }))
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Queued {
    pub status: String,
}

/// Queue a widget message for the WhatsApp workflow.
///
/// Returns immediately; the reply shows up in the history once the
/// workflow has run.
pub async fn send(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<(StatusCode, Json<Queued>)> {
    let phone = normalize_to_e164(&req.phone_number);
    if phone.is_empty() || req.message.trim().is_empty() {
        return Err(RelayError::BadRequest(
            "phone_number and message are required".to_string(),
        ));
    }

    info!(phone = %phone, "Queued WhatsApp message from widget");

    let workflow = state.workflow.clone();
    let message = req.message;
    state.tasks.spawn(async move {
        if let Err(e) = workflow.handle_incoming(&phone, &message).await {
            error!(phone = %phone, error = %e, "Widget message failed");
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(Queued {
            status: "queued".to_string(),
        }),
    ))
}
