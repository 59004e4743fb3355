//! Lead storage.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Lead, NewLead};

/// Store a lead and return the stored record.
pub async fn create_lead(pool: &SqlitePool, lead: &NewLead) -> Result<Lead> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO leads (id, name, email, phone, request_type, message)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&lead.name)
    .bind(&lead.email)
    .bind(&lead.phone)
    .bind(&lead.request_type)
    .bind(&lead.message)
    .execute(pool)
    .await?;

    get_lead(pool, &id).await
}

/// Get a lead by ID.
pub async fn get_lead(pool: &SqlitePool, id: &str) -> Result<Lead> {
    sqlx::query_as::<_, Lead>(
        r#"
        SELECT id, name, email, phone, request_type, message, timestamp
        FROM leads
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Lead",
        id: id.to_string(),
    })
}
