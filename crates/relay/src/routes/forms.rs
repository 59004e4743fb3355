//! Contact form and support ticket endpoints.

use axum::extract::State;
use axum::Json;
use database::models::{Lead, NewLead, NewSupportTicket, SupportTicket};
use database::{lead, support_ticket, validation};
use tracing::{info, warn};

use crate::error::Result;
use crate::state::AppState;

/// Store a lead and send a WhatsApp welcome if a phone was given.
pub async fn create_lead(
    State(state): State<AppState>,
    Json(mut new): Json<NewLead>,
) -> Result<Json<Lead>> {
    validation::validate_required("name", &new.name)?;
    validation::validate_email(&new.email)?;
    validation::validate_required("request_type", &new.request_type)?;
    new.phone = non_blank(new.phone);
    new.message = non_blank(new.message);

    let lead = lead::create_lead(state.db.pool(), &new).await?;
    info!(id = %lead.id, request_type = %lead.request_type, "Lead created");

    match lead.phone.as_deref() {
        Some(phone) => {
            let welcome = format!(
                "Hello {}! Welcome to Vertex AI Tech. Our team will reach out to you soon.",
                lead.name
            );
            if state.workflow.deliver(phone, &welcome).await {
                info!("WhatsApp welcome message sent to {} at {}", lead.name, phone);
            } else {
                warn!("Failed to send WhatsApp message to {} at {}", lead.name, phone);
            }
        }
        None => info!("No phone number provided for {}, skipping WhatsApp message", lead.name),
    }

    Ok(Json(lead))
}

/// Store a support ticket and send a WhatsApp confirmation if a phone was given.
pub async fn create_support_ticket(
    State(state): State<AppState>,
    Json(mut new): Json<NewSupportTicket>,
) -> Result<Json<SupportTicket>> {
    validation::validate_email(&new.email)?;
    validation::validate_required("issue_type", &new.issue_type)?;
    validation::validate_required("description", &new.description)?;
    new.phone = non_blank(new.phone);

    let ticket = support_ticket::create_support_ticket(state.db.pool(), &new).await?;
    info!(id = %ticket.id, issue_type = %ticket.issue_type, "Support ticket created");

    if let Some(phone) = ticket.phone.as_deref() {
        let confirmation = format!(
            "Hello! Your support ticket has been created. Issue Type: {}. Our team will respond within 24 hours.",
            ticket.issue_type
        );
        if state.workflow.deliver(phone, &confirmation).await {
            info!("WhatsApp support confirmation sent to {} at {}", ticket.email, phone);
        } else {
            warn!("Failed to send WhatsApp support confirmation to {}", phone);
        }
    }

    Ok(Json(ticket))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
