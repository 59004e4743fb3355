//! Operator endpoints for the WhatsApp bot.

use axum::extract::{Path, State};
use axum::Json;
use database::Conversation;
use orchestrator::TeamAlert;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::error::{RelayError, Result};
use crate::state::AppState;

/// Full conversation record for a phone number, created if missing.
pub async fn conversation(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<Conversation>> {
    Ok(Json(state.workflow.conversation(&phone).await?))
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub phone_number: Option<String>,
    pub message: Option<String>,
}

/// Send a WhatsApp message outside the workflow.
pub async fn send(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<Json<Value>> {
    let (Some(phone), Some(message)) = (
        req.phone_number.filter(|p| !p.trim().is_empty()),
        req.message.filter(|m| !m.trim().is_empty()),
    ) else {
        return Err(RelayError::BadRequest(
            "phone_number and message are required".to_string(),
        ));
    };

    if !state.workflow.deliver(&phone, &message).await {
        return Err(RelayError::Internal("Failed to send message".to_string()));
    }

    Ok(Json(json!({ "status": "sent", "phone_number": phone })))
}

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub message: Option<String>,
    pub phone_number: Option<String>,
}

/// Send a free-form alert to the team number.
pub async fn notify_team(
    State(state): State<AppState>,
    Json(req): Json<NotifyRequest>,
) -> Result<Json<Value>> {
    let Some(message) = req.message.filter(|m| !m.trim().is_empty()) else {
        return Err(RelayError::BadRequest("message is required".to_string()));
    };

    let mut alert = TeamAlert::new(message);
    if let Some(phone) = req.phone_number.filter(|p| !p.trim().is_empty()) {
        alert = alert.phone(phone);
    }

    if !state.workflow.notify_team(&alert).await {
        return Err(RelayError::Internal(
            "Failed to send team notification".to_string(),
        ));
    }

    Ok(Json(json!({ "status": "sent", "message": "Team notification sent" })))
}

#[derive(Debug, Deserialize)]
pub struct TestBotRequest {
    #[serde(default = "default_test_phone")]
    pub phone_number: String,
    #[serde(default = "default_test_message")]
    pub message: String,
}

fn default_test_phone() -> String {
    "1234567890".to_string()
}

fn default_test_message() -> String {
    "Hello".to_string()
}

/// Run one message through the workflow by hand.
pub async fn test_bot(
    State(state): State<AppState>,
    Json(req): Json<TestBotRequest>,
) -> Result<Json<Value>> {
    if let Err(e) = state
        .workflow
        .handle_incoming(&req.phone_number, &req.message)
        .await
    {
        error!("Error in test bot: {}", e);
        return Err(RelayError::Internal("Internal server error".to_string()));
    }

    Ok(Json(json!({
        "status": "success",
        "phone_number": req.phone_number,
        "user_message": req.message,
        "bot_response": "Message processed successfully",
    })))
}
