//! The WhatsApp chat surface.
//!
//! Unlike the primary session nothing is stored locally: the relay owns
//! the conversation and the surface reloads it after every send. Sending
//! before a phone number is known queues the text and asks for a number
//! instead of blocking.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::RelayApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result, ValidationError};
use crate::message::ChatMessage;

/// What happened to a send request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Delivered to the relay; history was refreshed.
    Sent,
    /// No phone number yet. The text is queued until [`WhatsAppChat::provide_phone`].
    PhoneRequired,
    /// The relay call failed. The optimistic message stays visible.
    Failed,
    /// Blank input, or nothing was pending.
    Ignored,
    /// The surface was closed.
    Cancelled,
}

/// Keep digits and a single leading `+`.
///
/// Returns an empty string when no digits remain.
pub fn sanitize_phone(raw: &str) -> String {
    let raw = raw.trim();
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }
    if raw.starts_with('+') {
        format!("+{}", digits)
    } else {
        digits
    }
}

pub struct WhatsAppChat<A> {
    api: A,
    phone: Option<String>,
    pending: Vec<String>,
    messages: Vec<ChatMessage>,
    input: String,
    loading: bool,
    refresh_delay: Duration,
    request_timeout: Duration,
    cancel: CancellationToken,
}

impl<A: RelayApi> WhatsAppChat<A> {
    /// Open the surface, loading history if the phone number is known.
    pub async fn open(api: A, phone: Option<&str>, config: &ClientConfig) -> Self {
        let phone = phone.map(sanitize_phone).filter(|p| !p.is_empty());
        let mut chat = Self {
            api,
            phone,
            pending: Vec::new(),
            messages: Vec::new(),
            input: String::new(),
            loading: false,
            refresh_delay: config.refresh_delay,
            request_timeout: config.request_timeout,
            cancel: CancellationToken::new(),
        };
        if chat.phone.is_some() {
            chat.refresh().await;
        }
        chat
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// At least one send is waiting for a phone number.
    pub fn awaiting_phone(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Texts queued until a phone number is given, oldest first.
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Send whatever is in the input buffer.
    pub async fn submit(&mut self) -> SendOutcome {
        let text = std::mem::take(&mut self.input);
        self.send(&text).await
    }

    pub async fn send(&mut self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }
        if self.cancel.is_cancelled() {
            return SendOutcome::Cancelled;
        }

        match self.phone.clone() {
            Some(phone) => self.deliver(&phone, text).await,
            None => {
                self.pending.push(text.to_string());
                SendOutcome::PhoneRequired
            }
        }
    }

    /// Answer the phone prompt.
    ///
    /// A number with no digits abandons the queued sends. A valid number is
    /// kept, its history loaded, and the queued texts sent in order.
    ///
    /// Returns the outcome of the last send; delivery stops at the first
    /// send that does not go through.
    pub async fn provide_phone(&mut self, raw: &str) -> Result<SendOutcome> {
        let phone = sanitize_phone(raw);
        if phone.is_empty() {
            return Err(self.decline_phone());
        }

        info!("WhatsApp chat bound to {}", phone);
        self.phone = Some(phone.clone());
        self.refresh().await;

        let mut outcome = SendOutcome::Ignored;
        for text in std::mem::take(&mut self.pending) {
            outcome = self.deliver(&phone, &text).await;
            if outcome != SendOutcome::Sent {
                break;
            }
        }
        Ok(outcome)
    }

    /// Dismiss the phone prompt, dropping every queued text.
    ///
    /// Returns the error to show the user.
    pub fn decline_phone(&mut self) -> ClientError {
        self.pending.clear();
        ClientError::Validation(ValidationError::PhoneRequired)
    }

    /// Reload history from the relay, replacing the visible list.
    ///
    /// Failures are logged and leave the list untouched.
    pub async fn refresh(&mut self) -> bool {
        let Some(phone) = self.phone.clone() else {
            return false;
        };

        let result = tokio::select! {
            _ = self.cancel.cancelled() => return false,
            result = tokio::time::timeout(self.request_timeout, self.api.whatsapp_history(&phone)) => {
                result.unwrap_or(Err(ClientError::Timeout))
            }
        };

        match result {
            Ok(entries) => {
                self.messages = entries
                    .iter()
                    .map(|e| ChatMessage::from_history(&e.role, &e.content, &e.timestamp))
                    .collect();
                true
            }
            Err(e) => {
                warn!("Failed to load WhatsApp history for {}: {}", phone, e);
                false
            }
        }
    }

    /// Refresh every `interval` until the surface is closed.
    pub async fn poll(&mut self, interval: Duration) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {
                    self.refresh().await;
                }
            }
        }
        debug!("WhatsApp polling stopped");
    }

    /// Close the surface. Pending refreshes are dropped.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    async fn deliver(&mut self, phone: &str, text: &str) -> SendOutcome {
        self.messages.push(ChatMessage::user(text));
        self.input.clear();
        self.loading = true;
        let outcome = self.post_and_refresh(phone, text).await;
        self.loading = false;
        outcome
    }

    async fn post_and_refresh(&mut self, phone: &str, text: &str) -> SendOutcome {
        let result = tokio::select! {
            _ = self.cancel.cancelled() => return SendOutcome::Cancelled,
            result = tokio::time::timeout(self.request_timeout, self.api.whatsapp_send(phone, text)) => {
                result.unwrap_or(Err(ClientError::Timeout))
            }
        };

        if let Err(e) = result {
            warn!("Failed to send WhatsApp message for {}: {}", phone, e);
            return SendOutcome::Failed;
        }

        // The reply is produced asynchronously by the relay.
        tokio::select! {
            _ = self.cancel.cancelled() => return SendOutcome::Cancelled,
            _ = tokio::time::sleep(self.refresh_delay) => {}
        }
        self.refresh().await;
        SendOutcome::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HistoryEntry;
    use crate::message::Sender;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        History(String),
        Send(String, String),
    }

    /// Echoing relay: every send stores the message and a canned reply.
    #[derive(Clone, Default)]
    struct FakeRelay {
        calls: Arc<Mutex<Vec<Call>>>,
        history: Arc<Mutex<Vec<HistoryEntry>>>,
        fail_send: bool,
        fail_history: bool,
    }

    impl FakeRelay {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn entry(role: &str, content: &str) -> HistoryEntry {
            HistoryEntry {
                role: role.to_string(),
                content: content.to_string(),
                timestamp: "2026-03-01T10:00:00.000Z".to_string(),
            }
        }
    }

    #[async_trait]
    impl RelayApi for FakeRelay {
        async fn chat(&self, _content: &str) -> Result<String> {
            Ok(String::new())
        }

        async fn whatsapp_history(&self, phone: &str) -> Result<Vec<HistoryEntry>> {
            self.calls.lock().unwrap().push(Call::History(phone.to_string()));
            if self.fail_history {
                return Err(ClientError::Timeout);
            }
            Ok(self.history.lock().unwrap().clone())
        }

        async fn whatsapp_send(&self, phone: &str, message: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Send(phone.to_string(), message.to_string()));
            if self.fail_send {
                return Err(ClientError::Status {
                    status: 500,
                    body: String::new(),
                });
            }
            let mut history = self.history.lock().unwrap();
            history.push(Self::entry("user", message));
            history.push(Self::entry("assistant", &format!("re: {}", message)));
            Ok(())
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::default().with_refresh_delay(Duration::from_millis(1))
    }

    #[test]
    fn test_sanitize_phone() {
        assert_eq!(sanitize_phone("+1 (234) 567-8900"), "+12345678900");
        assert_eq!(sanitize_phone("0300-1112233"), "03001112233");
        assert_eq!(sanitize_phone("  +92 300 1112233 "), "+923001112233");
        assert_eq!(sanitize_phone("1+2+3"), "123");
        assert_eq!(sanitize_phone("++44 20"), "+4420");
        assert_eq!(sanitize_phone("call me"), "");
        assert_eq!(sanitize_phone("+"), "");
    }

    #[tokio::test]
    async fn test_open_without_phone_makes_no_requests() {
        let relay = FakeRelay::default();
        let chat = WhatsAppChat::open(relay.clone(), None, &config()).await;

        assert!(chat.messages().is_empty());
        assert!(chat.phone().is_none());
        assert!(relay.calls().is_empty());
    }

    #[tokio::test]
    async fn test_open_with_phone_loads_history() {
        let relay = FakeRelay::default();
        relay
            .history
            .lock()
            .unwrap()
            .push(FakeRelay::entry("assistant", "welcome back"));

        let chat = WhatsAppChat::open(relay.clone(), Some("+1 (234) 567-8900"), &config()).await;

        assert_eq!(chat.phone(), Some("+12345678900"));
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].sender, Sender::Bot);
        assert_eq!(relay.calls(), vec![Call::History("+12345678900".to_string())]);
    }

    #[tokio::test]
    async fn test_send_without_phone_waits_for_number() {
        let relay = FakeRelay::default();
        let mut chat = WhatsAppChat::open(relay.clone(), None, &config()).await;

        assert_eq!(chat.send("hello").await, SendOutcome::PhoneRequired);
        assert!(chat.awaiting_phone());
        assert!(relay.calls().is_empty());

        let err = chat.provide_phone("no digits here").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ValidationError::PhoneRequired)));
        assert!(!chat.awaiting_phone());
        assert!(relay.calls().is_empty());
    }

    #[tokio::test]
    async fn test_provide_phone_sends_pending_text() {
        let relay = FakeRelay::default();
        let mut chat = WhatsAppChat::open(relay.clone(), None, &config()).await;

        chat.send("hello").await;
        let outcome = chat.provide_phone("+1 (234) 567-8900").await.unwrap();

        assert_eq!(outcome, SendOutcome::Sent);
        assert_eq!(
            relay.calls(),
            vec![
                Call::History("+12345678900".to_string()),
                Call::Send("+12345678900".to_string(), "hello".to_string()),
                Call::History("+12345678900".to_string()),
            ]
        );
        let texts: Vec<&str> = chat.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "re: hello"]);
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_sends_before_phone_are_all_delivered_in_order() {
        let relay = FakeRelay::default();
        let mut chat = WhatsAppChat::open(relay.clone(), None, &config()).await;

        assert_eq!(chat.send("first").await, SendOutcome::PhoneRequired);
        assert_eq!(chat.send("second").await, SendOutcome::PhoneRequired);
        assert_eq!(chat.pending(), ["first", "second"]);

        let outcome = chat.provide_phone("12345").await.unwrap();

        assert_eq!(outcome, SendOutcome::Sent);
        assert!(!chat.awaiting_phone());
        let sends: Vec<Call> = relay
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Send(..)))
            .collect();
        assert_eq!(
            sends,
            vec![
                Call::Send("12345".to_string(), "first".to_string()),
                Call::Send("12345".to_string(), "second".to_string()),
            ]
        );
        let texts: Vec<&str> = chat.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "re: first", "second", "re: second"]);
    }

    #[tokio::test]
    async fn test_send_forwards_text_as_typed() {
        let relay = FakeRelay::default();
        let mut chat = WhatsAppChat::open(relay.clone(), Some("12345"), &config()).await;

        assert_eq!(chat.send("  hi there ").await, SendOutcome::Sent);
        assert_eq!(chat.send("   ").await, SendOutcome::Ignored);

        assert!(relay
            .calls()
            .contains(&Call::Send("12345".to_string(), "  hi there ".to_string())));
    }

    #[tokio::test]
    async fn test_decline_phone() {
        let relay = FakeRelay::default();
        let mut chat = WhatsAppChat::open(relay.clone(), None, &config()).await;

        chat.send("hello").await;
        chat.send("again").await;
        let err = chat.decline_phone();

        assert!(matches!(err, ClientError::Validation(ValidationError::PhoneRequired)));
        assert!(!chat.awaiting_phone());
        assert!(relay.calls().is_empty());
    }

    #[tokio::test]
    async fn test_history_replaces_optimistic_message() {
        let relay = FakeRelay::default();
        let mut chat = WhatsAppChat::open(relay.clone(), Some("12345"), &config()).await;

        chat.set_input("price?");
        assert_eq!(chat.submit().await, SendOutcome::Sent);

        assert_eq!(chat.input(), "");
        let view: Vec<(Sender, &str)> = chat
            .messages()
            .iter()
            .map(|m| (m.sender, m.text.as_str()))
            .collect();
        assert_eq!(view, vec![(Sender::User, "price?"), (Sender::Bot, "re: price?")]);
    }

    #[tokio::test]
    async fn test_send_failure_keeps_visible_list() {
        let relay = FakeRelay {
            fail_send: true,
            ..FakeRelay::default()
        };
        let mut chat = WhatsAppChat::open(relay.clone(), Some("12345"), &config()).await;

        assert_eq!(chat.send("hello").await, SendOutcome::Failed);

        assert_eq!(chat.messages().len(), 1);
        assert!(chat.messages()[0].is_user());
        assert!(!chat.is_loading());
        // No refresh after a failed send.
        assert_eq!(relay.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_history_failure_is_silent() {
        let relay = FakeRelay {
            fail_history: true,
            ..FakeRelay::default()
        };
        let mut chat = WhatsAppChat::open(relay.clone(), Some("12345"), &config()).await;

        assert_eq!(chat.send("hello").await, SendOutcome::Sent);
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].text, "hello");
    }

    #[tokio::test]
    async fn test_close_drops_pending_refresh() {
        let relay = FakeRelay::default();
        let config = config().with_refresh_delay(Duration::from_secs(10));
        let mut chat = WhatsAppChat::open(relay.clone(), Some("12345"), &config).await;
        let token = chat.cancellation_token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        assert_eq!(chat.send("hello").await, SendOutcome::Cancelled);
        assert!(!chat.is_loading());
        // History call on open, then the send; the refresh never happened.
        assert_eq!(relay.calls().len(), 2);
        assert_eq!(chat.send("again").await, SendOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_poll_until_closed() {
        let relay = FakeRelay::default();
        let mut chat = WhatsAppChat::open(relay.clone(), Some("12345"), &config()).await;
        let token = chat.cancellation_token();

        relay
            .history
            .lock()
            .unwrap()
            .push(FakeRelay::entry("assistant", "pushed later"));

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });
        chat.poll(Duration::from_millis(5)).await;

        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].text, "pushed later");
        assert!(relay.calls().len() >= 2);
    }
}
