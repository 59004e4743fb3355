//! Error types for brain operations.

use thiserror::Error;

/// Errors that can occur while generating a reply.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The brain is misconfigured (missing API key, bad URL, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The upstream provider could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered but the reply could not be used.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The brain is temporarily unavailable.
    #[error("brain unavailable: {0}")]
    Unavailable(String),

    /// A timeout occurred during processing.
    #[error("processing timed out")]
    Timeout,
}
