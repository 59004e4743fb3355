//! Website chat endpoint.

use axum::extract::State;
use axum::Json;
use brain_core::InboundMessage;
use database::{message, validation};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Sender id used for website chat messages.
const WEB_SENDER: &str = "web";

/// A chat message from the widget.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default = "default_role")]
    pub role: String,
    pub content: String,
}

fn default_role() -> String {
    "user".to_string()
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Answer one chat message.
///
/// The user message is stored, the model is asked without history, and the
/// reply is stored and returned.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    validation::validate_required("content", &req.content)?;

    let pool = state.db.pool();
    message::create_message(pool, &req.role, &req.content).await?;

    info!(
        chars = req.content.chars().count(),
        brain = state.chat_brain.name(),
        "Answering web chat message"
    );

    let reply = state
        .chat_brain
        .process(InboundMessage::direct(WEB_SENDER, &req.content, 0))
        .await?;

    message::create_message(pool, "assistant", &reply.text).await?;

    Ok(Json(ChatResponse {
        response: reply.text,
    }))
}
