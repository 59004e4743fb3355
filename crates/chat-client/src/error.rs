//! Error types for the chat client.

use thiserror::Error;

/// Input problems caught before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("a phone number is required to chat on WhatsApp")]
    PhoneRequired,
}

/// Errors that can occur while talking to the relay or storage.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with a non-success status.
    #[error("relay returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The relay answered 2xx with a body we could not use.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request timed out")]
    Timeout,

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A form handler rejected the payload.
    #[error("submission failed: {0}")]
    Submission(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
