//! The primary chat session.
//!
//! A session keeps the full message list in memory and mirrors it to a
//! [`SessionStore`] after every change. Each change is also published on a
//! watch channel so a view can redraw and scroll.

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::RelayApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::message::ChatMessage;
use crate::store::SessionStore;

/// Snapshot published after every change to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionUpdate {
    /// Number of messages in the session.
    pub len: usize,
    /// A reply is being waited for.
    pub typing: bool,
}

/// Chat with the web assistant, persisted under a fixed key.
pub struct ChatSession<A, S> {
    api: A,
    store: S,
    storage_key: String,
    request_timeout: Duration,
    messages: Vec<ChatMessage>,
    input: String,
    typing: bool,
    updates: watch::Sender<SessionUpdate>,
    cancel: CancellationToken,
}

impl<A: RelayApi, S: SessionStore> ChatSession<A, S> {
    /// Open the session stored under `config.storage_key`.
    ///
    /// Starts from a single welcome message when nothing usable is stored.
    pub fn open(api: A, store: S, config: &ClientConfig) -> Self {
        let stored = match store.load(&config.storage_key) {
            Ok(Some(messages)) if !messages.is_empty() => Some(messages),
            Ok(_) => None,
            Err(e) => {
                warn!("Discarding unreadable chat history: {}", e);
                None
            }
        };
        let fresh = stored.is_none();
        let messages = stored.unwrap_or_else(|| vec![ChatMessage::welcome()]);

        let (updates, _) = watch::channel(SessionUpdate {
            len: messages.len(),
            typing: false,
        });

        let session = Self {
            api,
            store,
            storage_key: config.storage_key.clone(),
            request_timeout: config.request_timeout,
            messages,
            input: String::new(),
            typing: false,
            updates,
            cancel: CancellationToken::new(),
        };
        if fresh {
            session.persist();
        }
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Receive a [`SessionUpdate`] after every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionUpdate> {
        self.updates.subscribe()
    }

    /// Token that ends the session when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send whatever is in the input buffer.
    pub async fn submit(&mut self) -> Option<ChatMessage> {
        let text = std::mem::take(&mut self.input);
        self.send(&text).await
    }

    /// Send a message and wait for the reply.
    ///
    /// Returns the bot message that was appended: the reply, or the
    /// fallback message if the request failed. Returns `None` for blank
    /// input and when the session was closed before a reply arrived.
    pub async fn send(&mut self, text: &str) -> Option<ChatMessage> {
        if text.trim().is_empty() || self.cancel.is_cancelled() {
            return None;
        }

        self.messages.push(ChatMessage::user(text));
        self.input.clear();
        self.typing = true;
        self.persist();

        let result = tokio::select! {
            _ = self.cancel.cancelled() => None,
            result = tokio::time::timeout(self.request_timeout, self.api.chat(text)) => {
                Some(result.unwrap_or(Err(ClientError::Timeout)))
            }
        };

        self.typing = false;
        let reply = match result {
            None => {
                debug!("Chat session closed while waiting for a reply");
                self.publish();
                return None;
            }
            Some(Ok(response)) => ChatMessage::bot(response),
            Some(Err(e)) => {
                warn!("Chat request failed: {}", e);
                ChatMessage::fallback()
            }
        };

        self.messages.push(reply.clone());
        self.persist();
        Some(reply)
    }

    /// Reset to a single fresh welcome message.
    pub fn clear(&mut self) {
        self.messages = vec![ChatMessage::welcome()];
        self.persist();
    }

    /// End the session. An in-flight send appends nothing further.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.storage_key, &self.messages) {
            warn!("Failed to persist chat history: {}", e);
        }
        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(SessionUpdate {
            len: self.messages.len(),
            typing: self.typing,
        });
    }
}
