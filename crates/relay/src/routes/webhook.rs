//! Inbound WhatsSMS webhook.
//!
//! The gateway retries anything that isn't a 200, so every outcome
//! (including bad payloads) answers 200 with a `status: ok` body.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use whatssms::{body_secret, parse_body, WebhookEvent};

use crate::state::AppState;

/// Header some gateway setups use for the shared secret.
pub const SECRET_HEADER: &str = "x-webhook-secret";

fn ok_with(key: &str, value: &str) -> Json<Value> {
    Json(json!({ "status": "ok", key: value }))
}

/// Verification ping.
pub async fn ready() -> Json<Value> {
    Json(json!({ "status": "webhook_ready", "service": "whatssms_bot" }))
}

/// Receive a message from the gateway.
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    debug!(content_type = ?content_type, bytes = body.len(), "Incoming webhook");

    let payload = match parse_body(content_type, &body) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Error parsing webhook body: {}", e);
            return ok_with("error", "parse_error");
        }
    };

    let Some(expected) = state.webhook_secret.as_deref() else {
        error!("WEBHOOK_SECRET is not configured");
        return ok_with("error", "webhook_secret_not_configured");
    };

    let incoming = body_secret(&payload).or_else(|| {
        headers
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    });
    match incoming.as_deref() {
        Some(secret) if secret != expected => warn!("Invalid webhook secret"),
        Some(_) => info!("Webhook secret verified"),
        None => info!("No webhook secret provided"),
    }

    let Some(event) = WebhookEvent::from_body(&payload) else {
        warn!("Invalid message format - missing required fields");
        return ok_with("message", "ignored");
    };

    info!(
        channel = %event.channel,
        message_id = %event.message_id,
        bot_account = %event.bot_account,
        raw_sender = %event.sender_raw,
        sender = %event.sender,
        timestamp = %event.timestamp,
        "Webhook message"
    );

    if event.sender.is_empty() {
        error!("No sender found in payload, cannot reply");
        return ok_with("error", "no_sender");
    }

    match state.workflow.handle_incoming(&event.sender, &event.message).await {
        Ok(delivered) => {
            info!(sender = %event.sender, delivered, "Webhook message processed");
            ok_with("message", "processed")
        }
        Err(e) => {
            error!("Error in bot processing: {}", e);
            ok_with("error", "bot_processing_failed")
        }
    }
}
