//! Client side of the support chat.
//!
//! Three surfaces talk to the relay:
//!
//! - [`ChatSession`] - the web assistant chat, persisted through a [`SessionStore`]
//! - [`WhatsAppChat`] - a WhatsApp conversation owned by the relay, keyed by phone
//! - [`ContactForm`] / [`SupportTicketForm`] - lead capture, submitted via a [`FormSubmitter`]
//!
//! All relay access goes through the [`RelayApi`] trait; [`RelayClient`] is
//! the HTTP implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use chat_client::{ChatSession, ClientConfig, FileStore, RelayClient};
//!
//! # async fn run() -> Result<(), chat_client::ClientError> {
//! let config = ClientConfig::from_env();
//! let api = RelayClient::new(config.clone())?;
//! let store = FileStore::new(&config.storage_dir);
//!
//! let mut session = ChatSession::open(api, store, &config);
//! if let Some(reply) = session.send("How much does an app cost?").await {
//!     println!("{}", chat_client::render(&reply));
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod message;
pub mod render;
pub mod session;
pub mod store;
pub mod whatsapp;

pub use api::{HistoryEntry, LeadRequest, RelayApi, RelayClient, TicketRequest, DEFAULT_REQUEST_TYPE};
pub use config::ClientConfig;
pub use error::{ClientError, Result, ValidationError};
pub use forms::{
    ContactForm, ContactFormData, FormState, FormSubmitter, IssueType, SupportTicketData,
    SupportTicketForm,
};
pub use message::{ChatMessage, Sender, FALLBACK_TEXT, WELCOME_TEXT};
pub use render::{render, Align, Bubble};
pub use session::{ChatSession, SessionUpdate};
pub use store::{FileStore, MemoryStore, SessionStore};
pub use whatsapp::{sanitize_phone, SendOutcome, WhatsAppChat};
