//! Web chat message storage.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::Message;

/// Store a chat message and return the stored record.
pub async fn create_message(pool: &SqlitePool, role: &str, content: &str) -> Result<Message> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO messages (id, role, content)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(role)
    .bind(content)
    .execute(pool)
    .await?;

    get_message(pool, &id).await
}

/// Get a message by ID.
pub async fn get_message(pool: &SqlitePool, id: &str) -> Result<Message> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, role, content, timestamp
        FROM messages
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Message",
        id: id.to_string(),
    })
}

/// The most recent `limit` messages, oldest first.
pub async fn get_last_messages(pool: &SqlitePool, limit: i64) -> Result<Vec<Message>> {
    let rows = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, role, content, timestamp
        FROM (
            SELECT seq, id, role, content, timestamp
            FROM messages
            ORDER BY seq DESC
            LIMIT ?
        )
        ORDER BY seq ASC
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
