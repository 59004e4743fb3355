//! Scripted brain - replays canned replies and records its inputs.

use std::collections::VecDeque;
use std::sync::Arc;

use brain_core::{async_trait, Brain, BrainError, InboundMessage, OutboundMessage};
use tokio::sync::Mutex;

/// A brain that answers from a fixed script.
///
/// Each call pops the next reply; once the script is exhausted it keeps
/// answering with the last reply. Every inbound message is recorded so tests
/// can assert on the history that was passed in. Clones share state.
#[derive(Debug, Clone)]
pub struct ScriptedBrain {
    replies: Arc<Mutex<VecDeque<String>>>,
    last: Arc<Mutex<String>>,
    received: Arc<Mutex<Vec<InboundMessage>>>,
}

impl ScriptedBrain {
    /// Create a brain that replies with `replies` in order.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let replies: VecDeque<String> = replies.into_iter().map(Into::into).collect();
        let last = replies.back().cloned().unwrap_or_default();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            last: Arc::new(Mutex::new(last)),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Messages received so far, oldest first.
    pub async fn received(&self) -> Vec<InboundMessage> {
        self.received.lock().await.clone()
    }

    /// Number of calls so far.
    pub async fn call_count(&self) -> usize {
        self.received.lock().await.len()
    }
}

#[async_trait]
impl Brain for ScriptedBrain {
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        self.received.lock().await.push(message.clone());

        let text = match self.replies.lock().await.pop_front() {
            Some(reply) => reply,
            None => self.last.lock().await.clone(),
        };

        Ok(OutboundMessage::reply_to(&message, text))
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_repeats_last() {
        let brain = ScriptedBrain::new(["one", "two"]);

        let mut texts = Vec::new();
        for _ in 0..3 {
            let reply = brain
                .process(InboundMessage::direct("web", "q", 0))
                .await
                .unwrap();
            texts.push(reply.text);
        }

        assert_eq!(texts, vec!["one", "two", "two"]);
        assert_eq!(brain.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_records_history() {
        let brain = ScriptedBrain::new(["ok"]);
        let msg = InboundMessage::direct("+92300", "price?", 0)
            .with_history(vec![brain_core::HistoryMessage::user("hello")]);

        brain.process(msg).await.unwrap();

        let received = brain.received().await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].history.len(), 1);
        assert_eq!(received[0].text, "price?");
    }
}
