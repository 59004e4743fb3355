//! Error types for workflow operations.

use brain_core::BrainError;
use support_database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while handling a conversation.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Brain processing failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Conversation storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] DatabaseError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The sender phone number was empty.
    #[error("no sender phone number")]
    NoSender,
}
