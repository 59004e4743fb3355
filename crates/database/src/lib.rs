//! SQLite persistence layer for the support relay.
//!
//! This crate provides async storage for the web chat transcript, sales
//! leads, support tickets and WhatsApp conversations using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, models::NewLead, lead};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:support.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let lead = NewLead {
//!         name: "Ayesha".to_string(),
//!         email: "ayesha@example.com".to_string(),
//!         phone: None,
//!         request_type: "services".to_string(),
//!         message: None,
//!     };
//!     lead::create_lead(db.pool(), &lead).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod conversation;
pub mod error;
pub mod lead;
pub mod message;
pub mod models;
pub mod support_ticket;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{
    Conversation, ConversationMessage, Lead, Message, NewLead, NewSupportTicket, SupportTicket,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/support.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{STATUS_FINALIZED, STATUS_PENDING};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_messages_are_returned_oldest_first() {
        let db = test_db().await;

        for i in 0..5 {
            message::create_message(db.pool(), "user", &format!("m{}", i))
                .await
                .unwrap();
        }

        let last = message::get_last_messages(db.pool(), 3).await.unwrap();
        let contents: Vec<_> = last.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
        assert_eq!(message::get_last_messages(db.pool(), 50).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_create_message_assigns_uuid_and_timestamp() {
        let db = test_db().await;

        let msg = message::create_message(db.pool(), "assistant", "hi")
            .await
            .unwrap();
        assert_eq!(msg.id.len(), 36);
        assert!(!msg.timestamp.is_empty());
        assert_eq!(message::get_message(db.pool(), &msg.id).await.unwrap(), msg);

        let missing = message::get_message(db.pool(), "nope").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_lead_roundtrip() {
        let db = test_db().await;

        let new = NewLead {
            name: "Ayesha".to_string(),
            email: "ayesha@example.com".to_string(),
            phone: Some("+923001112233".to_string()),
            request_type: "demo".to_string(),
            message: None,
        };
        let lead = lead::create_lead(db.pool(), &new).await.unwrap();

        assert_eq!(lead.name, "Ayesha");
        assert_eq!(lead.phone.as_deref(), Some("+923001112233"));
        assert_eq!(lead.message, None);
        assert_eq!(lead::get_lead(db.pool(), &lead.id).await.unwrap(), lead);
    }

    #[tokio::test]
    async fn test_support_ticket_starts_open() {
        let db = test_db().await;

        let new = NewSupportTicket {
            email: "bob@example.com".to_string(),
            issue_type: "login".to_string(),
            description: "Cannot sign in".to_string(),
            phone: None,
        };
        let ticket = support_ticket::create_support_ticket(db.pool(), &new)
            .await
            .unwrap();
        assert_eq!(ticket.status, "open");

        let fetched = support_ticket::get_support_ticket(db.pool(), &ticket.id)
            .await
            .unwrap();
        assert_eq!(fetched, ticket);
    }

    #[tokio::test]
    async fn test_conversation_lifecycle() {
        let db = test_db().await;
        let phone = "+923001112233";

        assert!(conversation::get_conversation(db.pool(), phone)
            .await
            .unwrap()
            .is_none());

        let mut convo = conversation::get_or_create_conversation(db.pool(), phone)
            .await
            .unwrap();
        assert_eq!(convo.status, STATUS_PENDING);
        assert_eq!(convo.messages_used, 0);
        assert!(convo.client_name.is_none());
        assert!(convo.messages.is_empty());

        convo.push_client("hello");
        convo.push_assistant("Hello! What is your name, sir?");
        convo.client_name = Some("Unknown".to_string());
        conversation::save_conversation(db.pool(), &convo).await.unwrap();

        // Saving again must not duplicate messages.
        convo.push_client("Ali");
        convo.status = STATUS_FINALIZED.to_string();
        conversation::save_conversation(db.pool(), &convo).await.unwrap();
        conversation::save_conversation(db.pool(), &convo).await.unwrap();

        let loaded = conversation::get_or_create_conversation(db.pool(), phone)
            .await
            .unwrap();
        assert_eq!(loaded.messages_used, 2);
        assert_eq!(loaded.client_name.as_deref(), Some("Unknown"));
        assert!(loaded.is_finalized());
        let roles: Vec<_> = loaded.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["client", "assistant", "client"]);
        assert_eq!(loaded.messages[2].message, "Ali");
    }

    #[tokio::test]
    async fn test_close_rejects_further_queries() {
        let db = test_db().await;
        db.close().await;

        assert!(db.pool().is_closed());
        assert!(message::get_last_messages(db.pool(), 10).await.is_err());
    }

    #[tokio::test]
    async fn test_save_unknown_conversation_fails() {
        let db = test_db().await;
        let convo = Conversation {
            phone_number: "+1".to_string(),
            client_name: None,
            status: STATUS_PENDING.to_string(),
            messages_used: 0,
            created_at: String::new(),
            updated_at: String::new(),
            messages: Vec::new(),
        };
        let result = conversation::save_conversation(db.pool(), &convo).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
