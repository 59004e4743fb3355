//! Echo brain implementation - echoes messages back.

use brain_core::{async_trait, Brain, BrainError, InboundMessage, OutboundMessage};

/// A brain that echoes the customer's text back.
#[derive(Debug, Clone, Default)]
pub struct EchoBrain {
    prefix: Option<String>,
}

impl EchoBrain {
    /// Create a new EchoBrain with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an EchoBrain that answers `"<prefix><text>"`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl Brain for EchoBrain {
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        let text = match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, message.text),
            None => message.text.clone(),
        };

        Ok(OutboundMessage::reply_to(&message, text))
    }

    fn name(&self) -> &str {
        "EchoBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_no_prefix() {
        let brain = EchoBrain::new();
        let response = brain
            .process(InboundMessage::direct("+923001112233", "Hello!", 0))
            .await
            .unwrap();

        assert_eq!(response.text, "Hello!");
        assert_eq!(response.recipient, "+923001112233");
    }

    #[tokio::test]
    async fn test_echo_with_prefix() {
        let brain = EchoBrain::with_prefix("Echo: ");
        let response = brain
            .process(InboundMessage::direct("web", "Hello!", 0))
            .await
            .unwrap();

        assert_eq!(response.text, "Echo: Hello!");
        assert_eq!(brain.name(), "EchoBrain");
    }
}
