//! WhatsSMS.io gateway client library.
//!
//! This crate provides a Rust client for the WhatsSMS.io HTTP API used to
//! deliver WhatsApp messages, plus the pieces needed on the receiving side:
//!
//! - Sending text messages to a recipient ([`WhatsSmsClient::send_text`])
//! - Normalising phone numbers to E.164 ([`normalize_to_e164`])
//! - Decoding inbound webhook deliveries in every shape the gateway uses
//!   ([`webhook`])
//!
//! # Example
//!
//! ```no_run
//! use whatssms::{WhatsSmsClient, WhatsSmsConfig};
//!
//! # async fn example() -> Result<(), whatssms::WhatsSmsError> {
//! let config = WhatsSmsConfig::from_env()?;
//! let client = WhatsSmsClient::new(config)?;
//!
//! let receipt = client.send_text("03001112233", "Hello!").await?;
//! println!("Delivered to {}", receipt.recipient);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod phone;
pub mod types;
pub mod webhook;

pub use client::WhatsSmsClient;
pub use config::WhatsSmsConfig;
pub use error::{WebhookError, WhatsSmsError};
pub use phone::normalize_to_e164;
pub use types::*;
pub use webhook::{body_secret, parse_body, WebhookBody, WebhookEvent};
