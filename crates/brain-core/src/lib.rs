//! Core trait and types for brain implementations.
//!
//! A brain turns a customer message (plus any prior conversation) into a
//! reply. The relay uses one brain for the web chat endpoint and one for the
//! WhatsApp workflow. This crate defines:
//!
//! - [`Brain`] - The trait that all brain implementations must implement
//! - [`InboundMessage`] / [`OutboundMessage`] - Message types for input/output
//! - [`HistoryMessage`] - A prior turn handed to the model as context
//! - [`BrainError`] - Error types for brain operations
//!
//! # Example
//!
//! ```rust
//! use brain_core::{Brain, BrainError, InboundMessage, OutboundMessage};
//! use async_trait::async_trait;
//!
//! struct MyBrain;
//!
//! #[async_trait]
//! impl Brain for MyBrain {
//!     async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
//!         Ok(OutboundMessage::reply_to(&message, "Hello!"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyBrain"
//!     }
//! }
//! ```

mod error;
mod message;
mod prompt;
mod trait_def;

pub use error::BrainError;
pub use message::{HistoryMessage, InboundMessage, OutboundMessage};
pub use prompt::{prompt_fingerprint, WEB_CHAT_SYSTEM_PROMPT, WHATSAPP_SYSTEM_PROMPT};
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
