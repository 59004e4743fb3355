//! GroqBrain implementation using Groq's chat completions API.

use brain_core::{
    async_trait, prompt_fingerprint, Brain, BrainError, InboundMessage, OutboundMessage,
};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
};
use crate::config::GroqBrainConfig;

/// A brain implementation backed by Groq-hosted LLaMA models.
///
/// The brain itself is stateless: conversation context arrives with each
/// [`InboundMessage`] as `history`, because the relay keeps conversations in
/// the database rather than in memory.
pub struct GroqBrain {
    client: Client,
    config: GroqBrainConfig,
}

impl GroqBrain {
    /// Create a new GroqBrain with the given configuration.
    pub fn new(config: GroqBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("Groq API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        if let Some(ref prompt) = config.system_prompt {
            info!("GroqBrain system prompt fingerprint: {}", prompt_fingerprint(prompt));
        }

        info!(
            "GroqBrain initialized with model: {}, temperature: {:?}, max_tokens: {:?}",
            config.model, config.temperature, config.max_tokens
        );

        Ok(Self { client, config })
    }

    /// Create a GroqBrain from environment variables.
    ///
    /// See [`GroqBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(GroqBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GroqBrainConfig {
        &self.config
    }

    /// Build the messages array: system prompt, history, then the new message.
    fn build_messages(&self, message: &InboundMessage) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(message.history.len() + 2);

        if let Some(ref system_prompt) = self.config.system_prompt {
            messages.push(ChatMessage::system(system_prompt.clone()));
        }

        for turn in &message.history {
            messages.push(ChatMessage {
                role: turn.role.clone(),
                content: turn.content.clone(),
            });
        }

        messages.push(ChatMessage::user(message.text.clone()));
        messages
    }

    /// Make a chat completion request.
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, BrainError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            stream: false,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        info!("Calling Groq API with {} messages", request.messages.len());

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrainError::Timeout
                } else {
                    BrainError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();
        debug!("Groq API response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(BrainError::ProcessingFailed(format!(
                    "API error ({}, {}): {}",
                    status.as_u16(),
                    api_error.error.error_type.as_deref().unwrap_or("unknown"),
                    api_error.error.message
                )));
            }

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Brain for GroqBrain {
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        debug!("Processing message from {}: {}", message.sender, message.text);

        let messages = self.build_messages(&message);
        let completion = self.chat_completion(messages).await?;

        let choice = completion.choices.first().ok_or_else(|| {
            BrainError::ProcessingFailed("No choices in response".to_string())
        })?;

        let reply = choice
            .message
            .content
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                warn!(
                    "Empty completion (role: {:?}, finish_reason: {:?})",
                    choice.message.role, choice.finish_reason
                );
                BrainError::ProcessingFailed("No content in response".to_string())
            })?
            .to_string();

        if let Some(usage) = completion.usage {
            debug!(
                "Token usage ({}) - prompt: {}, completion: {}, total: {}",
                completion.model.as_deref().unwrap_or(&self.config.model),
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        info!("Got response: {}", preview(&reply, 100));

        Ok(OutboundMessage::reply_to(&message, reply))
    }

    fn name(&self) -> &str {
        "GroqBrain"
    }
}

/// First `max` characters of `text`, for logs.
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::HistoryMessage;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_brain(server: &MockServer) -> GroqBrain {
        let config = GroqBrainConfig::builder()
            .api_key("test-key")
            .api_url(format!("{}/openai/v1/chat/completions", server.uri()))
            .system_prompt("You are a test assistant")
            .temperature(0.3)
            .build();
        GroqBrain::new(config).unwrap()
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "llama-3.1-8b-instant",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        })
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = GroqBrain::new(GroqBrainConfig::default());
        assert!(matches!(result, Err(BrainError::Configuration(_))));
    }

    #[test]
    fn test_build_messages_orders_system_history_user() {
        let config = GroqBrainConfig::builder()
            .api_key("k")
            .system_prompt("sys")
            .build();
        let brain = GroqBrain::new(config).unwrap();
        let message = InboundMessage::direct("+92300", "third", 0).with_history(vec![
            HistoryMessage::user("first"),
            HistoryMessage::assistant("second"),
        ]);

        let messages = brain.build_messages(&message);
        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(messages[3].content, "third");
    }

    #[tokio::test]
    async fn test_process_returns_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama-3.1-8b-instant",
                "stream": false,
                "max_tokens": 200
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Hi there!  ")))
            .expect(1)
            .mount(&server)
            .await;

        let brain = test_brain(&server);
        let reply = brain
            .process(InboundMessage::direct("web", "hello", 0))
            .await
            .unwrap();

        assert_eq!(reply.text, "Hi there!");
        assert_eq!(reply.recipient, "web");
    }

    #[tokio::test]
    async fn test_process_maps_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Invalid API Key", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let brain = test_brain(&server);
        let err = brain
            .process(InboundMessage::direct("web", "hello", 0))
            .await
            .unwrap_err();

        match err {
            BrainError::ProcessingFailed(msg) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Invalid API Key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_process_rejects_empty_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("")))
            .mount(&server)
            .await;

        let brain = test_brain(&server);
        let result = brain.process(InboundMessage::direct("web", "hello", 0)).await;
        assert!(matches!(result, Err(BrainError::ProcessingFailed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let config = GroqBrainConfig::builder()
            .api_key("k")
            .api_url("http://127.0.0.1:9/v1/chat/completions")
            .build();
        let brain = GroqBrain::new(config).unwrap();

        let result = brain.process(InboundMessage::direct("web", "hello", 0)).await;
        assert!(matches!(result, Err(BrainError::Network(_))));
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdefghij", 3), "abc...");
    }
}
