//! WhatsApp conversation workflow for the support relay.
//!
//! This crate provides [`WhatsAppWorkflow`], which turns inbound WhatsApp
//! messages into replies and team alerts.
//!
//! # Architecture
//!
//! ```text
//! WhatsApp message (webhook or /whatsapp/send)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     WHATSAPP WORKFLOW                       │
//! │                                                             │
//! │  1. Load or create the conversation (keyed by E.164 phone)  │
//! │         ↓                                                   │
//! │  2. Append the client message, count it                     │
//! │         ↓                                                   │
//! │  3. Plan the reply, first match wins:                       │
//! │     • ask for / capture the client's name                   │
//! │     • confident classifier hit → canned reply               │
//! │     • "call me" → promise contact, alert team               │
//! │     • "that's all" → finalize, alert team with summary      │
//! │     • message limit → hand over, alert team                 │
//! │     • otherwise → ask the brain with history                │
//! │         ↓                                                   │
//! │  4. Append the reply, save, deliver via MessageSender       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use orchestrator::WhatsAppWorkflow;
//! use whatssms::WhatsSmsClient;
//!
//! let sender = WhatsSmsClient::from_env()?;
//! let workflow = WhatsAppWorkflow::new(brain, db, sender, "+923001234567");
//! let delivered = workflow.handle_incoming("03001112233", "hello").await?;
//! ```

mod classifier;
mod error;
mod keywords;
mod notify;
mod sender;
mod workflow;

pub use classifier::{classify, Classification, Intent};
pub use error::OrchestratorError;
pub use keywords::{is_completion, wants_team_contact, COMPLETION_PHRASES, TEAM_CONTACT_PHRASES};
pub use notify::{conversation_summary, TeamAlert, ALERT_FOOTER};
pub use sender::{MessageSender, RecordingSender, SentMessage};
pub use workflow::{
    apology_for, brain_history, plan_reply, ReplyPlan, WhatsAppWorkflow, ASK_NAME_REPLY,
    FINALIZED_REPLY, LIMIT_REPLY, MESSAGE_LIMIT, TEAM_CONTACT_REPLY, UNKNOWN_NAME,
};

// Re-export brain-core types for convenience
pub use brain_core::{Brain, BrainError, InboundMessage, OutboundMessage};
