//! Error types for the WhatsSMS client.

use thiserror::Error;

/// Errors that can occur when talking to the WhatsSMS gateway.
#[derive(Debug, Error)]
pub enum WhatsSmsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success HTTP status.
    #[error("Gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The gateway answered 200 but its JSON status was not 200.
    #[error("Gateway rejected message to {recipient}: {body}")]
    Rejected { recipient: String, body: String },

    /// The gateway response body could not be understood.
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    /// Recipient was empty after normalisation.
    #[error("Invalid recipient: {0:?}")]
    InvalidRecipient(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Errors decoding an inbound webhook body.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The body was declared JSON but did not parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The body was not an object or form.
    #[error("Unsupported webhook payload: {0}")]
    Unsupported(String),
}
