//! A brain that always fails.

use brain_core::{async_trait, Brain, BrainError, InboundMessage, OutboundMessage};

/// Which error a [`FailingBrain`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    Processing,
}

/// A brain whose every call fails, for testing fallback replies.
#[derive(Debug, Clone)]
pub struct FailingBrain {
    kind: FailureKind,
}

impl FailingBrain {
    /// Fail with a network error.
    pub fn network() -> Self {
        Self {
            kind: FailureKind::Network,
        }
    }

    /// Fail with a timeout.
    pub fn timeout() -> Self {
        Self {
            kind: FailureKind::Timeout,
        }
    }

    /// Fail with a processing error (e.g. upstream 500).
    pub fn processing() -> Self {
        Self {
            kind: FailureKind::Processing,
        }
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn process(&self, _message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        Err(match self.kind {
            FailureKind::Network => BrainError::Network("connection refused".to_string()),
            FailureKind::Timeout => BrainError::Timeout,
            FailureKind::Processing => {
                BrainError::ProcessingFailed("API error (500): upstream failure".to_string())
            }
        })
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}
