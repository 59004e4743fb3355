//! Message sender trait and implementations.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use whatssms::WhatsSmsClient;

use crate::error::OrchestratorError;

/// Delivers outbound WhatsApp messages.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message.
    ///
    /// # Arguments
    /// * `recipient` - Phone number in any format the transport accepts
    /// * `text` - Message content
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError>;
}

#[async_trait]
impl<T: MessageSender + ?Sized> MessageSender for Arc<T> {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        (**self).send_message(recipient, text).await
    }
}

#[async_trait]
impl MessageSender for WhatsSmsClient {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        self.send_text(recipient, text)
            .await
            .map(|_| ())
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))
    }
}

/// A message sent through a [`RecordingSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub text: String,
}

/// A sender that remembers everything it was asked to send.
///
/// Clones share the same log. Can be told to fail so delivery errors can be
/// exercised.
#[derive(Debug, Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    fail: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender that records attempts but reports every one as failed.
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    /// Everything sent so far, oldest first.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Messages sent to one recipient.
    pub async fn sent_to(&self, recipient: &str) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.recipient == recipient)
            .map(|m| m.text.clone())
            .collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        self.sent.lock().await.push(SentMessage {
            recipient: recipient.to_string(),
            text: text.to_string(),
        });

        if self.fail {
            return Err(OrchestratorError::SendFailed(format!(
                "delivery to {} refused",
                recipient
            )));
        }
        Ok(())
    }
}
