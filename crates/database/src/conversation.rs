//! WhatsApp conversation storage.
//!
//! A conversation is one row in `whatsapp_conversations` plus its ordered
//! messages in `conversation_messages`. Messages are append-only, so saving
//! writes the row and inserts whichever messages are not stored yet.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Conversation, ConversationMessage, STATUS_PENDING};

/// Load a conversation with its messages.
pub async fn get_conversation(pool: &SqlitePool, phone_number: &str) -> Result<Option<Conversation>> {
    let record = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT phone_number, client_name, status, messages_used, created_at, updated_at
        FROM whatsapp_conversations
        WHERE phone_number = ?
        "#,
    )
    .bind(phone_number)
    .fetch_optional(pool)
    .await?;

    let Some(mut conversation) = record else {
        return Ok(None);
    };

    conversation.messages = list_messages(pool, phone_number).await?;
    Ok(Some(conversation))
}

/// Load a conversation, creating an empty pending one if none exists.
pub async fn get_or_create_conversation(
    pool: &SqlitePool,
    phone_number: &str,
) -> Result<Conversation> {
    sqlx::query(
        r#"
        INSERT INTO whatsapp_conversations (phone_number, status, messages_used)
        VALUES (?, ?, 0)
        ON CONFLICT(phone_number) DO NOTHING
        "#,
    )
    .bind(phone_number)
    .bind(STATUS_PENDING)
    .execute(pool)
    .await?;

    get_conversation(pool, phone_number)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Conversation",
            id: phone_number.to_string(),
        })
}

/// Persist a conversation's fields and any messages appended since it was loaded.
pub async fn save_conversation(pool: &SqlitePool, conversation: &Conversation) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE whatsapp_conversations
        SET client_name = ?, status = ?, messages_used = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE phone_number = ?
        "#,
    )
    .bind(&conversation.client_name)
    .bind(&conversation.status)
    .bind(conversation.messages_used)
    .bind(&conversation.phone_number)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Conversation",
            id: conversation.phone_number.clone(),
        });
    }

    let stored = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM conversation_messages
        WHERE phone_number = ?
        "#,
    )
    .bind(&conversation.phone_number)
    .fetch_one(&mut *tx)
    .await?;

    let stored = usize::try_from(stored).unwrap_or(0);
    for msg in conversation.messages.iter().skip(stored) {
        sqlx::query(
            r#"
            INSERT INTO conversation_messages (phone_number, role, message, timestamp)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&conversation.phone_number)
        .bind(&msg.role)
        .bind(&msg.message)
        .bind(&msg.timestamp)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!(
        phone = %conversation.phone_number,
        messages = conversation.messages.len(),
        "Saved conversation"
    );
    Ok(())
}

async fn list_messages(pool: &SqlitePool, phone_number: &str) -> Result<Vec<ConversationMessage>> {
    let rows = sqlx::query_as::<_, ConversationMessage>(
        r#"
        SELECT role, message, timestamp
        FROM conversation_messages
        WHERE phone_number = ?
        ORDER BY seq ASC
        "#,
    )
    .bind(phone_number)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
