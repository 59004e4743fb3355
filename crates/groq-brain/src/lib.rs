//! Groq-hosted LLaMA brain implementation.
//!
//! This crate provides a [`Brain`] that calls Groq's OpenAI-compatible chat
//! completions API. The relay builds two of them from one base configuration:
//! a low-temperature one for the website chat and one for WhatsApp
//! conversations that carries the conversation history.
//!
//! # Usage
//!
//! ```rust,no_run
//! use groq_brain::{Brain, GroqBrain, GroqBrainConfig, InboundMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GroqBrainConfig::from_env()?;
//!     let brain = GroqBrain::new(config)?;
//!     let reply = brain.process(InboundMessage::direct("web", "Hi!", 0)).await?;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::GroqBrain;
pub use config::{GroqBrainConfig, GroqBrainConfigBuilder, DEFAULT_API_URL, DEFAULT_MODEL};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, HistoryMessage, InboundMessage, OutboundMessage};
