//! HTTP relay for the Vertex AI Tech customer-support chat.
//!
//! Serves the website chat widget (chat, contact form, support tickets,
//! WhatsApp chat) and receives WhatsApp messages from the WhatsSMS gateway.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use brain_core::{prompt_fingerprint, Brain, WEB_CHAT_SYSTEM_PROMPT, WHATSAPP_SYSTEM_PROMPT};
use database::Database;
use groq_brain::{GroqBrain, GroqBrainConfig};
use orchestrator::{MessageSender, WhatsAppWorkflow};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use whatssms::{WhatsSmsClient, WhatsSmsConfig};

use crate::config::Config;
use crate::state::AppState;

/// Temperature for the website chat; WhatsApp uses the configured default.
const WEB_CHAT_TEMPERATURE: f32 = 0.3;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting support relay");

    let groq = GroqBrainConfig::from_env()?;
    let whatssms = WhatsSmsConfig::from_env()?;
    info!(api_url = %whatssms.api_url, account = %whatssms.account_id, "WhatsSMS configured");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Brains
    let chat_brain: Arc<dyn Brain> = Arc::new(GroqBrain::new(
        groq.with_profile(WEB_CHAT_SYSTEM_PROMPT, WEB_CHAT_TEMPERATURE),
    )?);
    // GROQ_SYSTEM_PROMPT overrides the WhatsApp prompt only.
    let whatsapp_prompt = groq
        .system_prompt
        .clone()
        .unwrap_or_else(|| WHATSAPP_SYSTEM_PROMPT.to_string());
    let whatsapp_temperature = groq.temperature.unwrap_or(0.7);
    let whatsapp_brain: Arc<dyn Brain> = Arc::new(GroqBrain::new(
        groq.with_profile(whatsapp_prompt.as_str(), whatsapp_temperature),
    )?);
    info!(
        model = %groq.model,
        web_prompt = %prompt_fingerprint(WEB_CHAT_SYSTEM_PROMPT),
        whatsapp_prompt = %prompt_fingerprint(&whatsapp_prompt),
        "Groq brains ready"
    );

    // WhatsApp workflow
    let team_number = whatssms.team_number.clone();
    let sender: Arc<dyn MessageSender> = Arc::new(WhatsSmsClient::new(whatssms)?);
    let workflow = WhatsAppWorkflow::new(whatsapp_brain, db.clone(), sender, team_number);

    if config.webhook_secret.is_none() {
        warn!("WEBHOOK_SECRET is not set; inbound webhooks will be ignored");
    }

    // Build application state
    let state = AppState::new(db.clone(), chat_brain, workflow, config.webhook_secret.clone());
    let tasks = state.tasks.clone();

    // Build router
    let app = routes::app(state, config.cors_origin.parse()?);

    // Start server
    info!(addr = %config.addr, origin = %config.cors_origin, "Support relay listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let queued widget messages finish before the pool goes away.
    tasks.close();
    info!(pending = tasks.len(), "Draining background tasks");
    tasks.wait().await;
    db.close().await;
    info!("Support relay stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
