//! Support ticket storage.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{NewSupportTicket, SupportTicket, TICKET_OPEN};

/// Store a support ticket with status "open" and return the stored record.
pub async fn create_support_ticket(
    pool: &SqlitePool,
    ticket: &NewSupportTicket,
) -> Result<SupportTicket> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO support_tickets (id, email, issue_type, description, status, phone)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&ticket.email)
    .bind(&ticket.issue_type)
    .bind(&ticket.description)
    .bind(TICKET_OPEN)
    .bind(&ticket.phone)
    .execute(pool)
    .await?;

    get_support_ticket(pool, &id).await
}

/// Get a support ticket by ID.
pub async fn get_support_ticket(pool: &SqlitePool, id: &str) -> Result<SupportTicket> {
    sqlx::query_as::<_, SupportTicket>(
        r#"
        SELECT id, email, issue_type, description, status, phone, timestamp
        FROM support_tickets
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "SupportTicket",
        id: id.to_string(),
    })
}
