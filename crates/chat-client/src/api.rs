//! HTTP access to the support relay.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Lead type used when the caller does not pick one.
pub const DEFAULT_REQUEST_TYPE: &str = "services";

/// The relay calls made by the chat surfaces.
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// Send a message to the web chat and return the reply text.
    async fn chat(&self, content: &str) -> Result<String>;

    /// Full WhatsApp history for a phone number, oldest first.
    async fn whatsapp_history(&self, phone: &str) -> Result<Vec<HistoryEntry>>;

    /// Queue a WhatsApp message. The reply arrives later in the history.
    async fn whatsapp_send(&self, phone: &str, message: &str) -> Result<()>;
}

#[async_trait]
impl<T: RelayApi + ?Sized> RelayApi for std::sync::Arc<T> {
    async fn chat(&self, content: &str) -> Result<String> {
        (**self).chat(content).await
    }

    async fn whatsapp_history(&self, phone: &str) -> Result<Vec<HistoryEntry>> {
        (**self).whatsapp_history(phone).await
    }

    async fn whatsapp_send(&self, phone: &str, message: &str) -> Result<()> {
        (**self).whatsapp_send(phone, message).await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: Option<String>,
}

/// One entry of a WhatsApp history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
struct HistoryReply {
    #[serde(default)]
    messages: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
struct WhatsAppSendRequest<'a> {
    phone_number: &'a str,
    message: &'a str,
}

/// Body of `POST /leads`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub request_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /support-tickets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketRequest {
    pub email: String,
    pub issue_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Reqwest-backed relay client.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    config: ClientConfig,
    request_type: String,
}

impl RelayClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            config,
            request_type: DEFAULT_REQUEST_TYPE.to_string(),
        })
    }

    /// Lead type sent with contact form submissions.
    pub fn with_request_type(mut self, request_type: impl Into<String>) -> Self {
        self.request_type = request_type.into();
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn request_type(&self) -> &str {
        &self.request_type
    }

    /// Create a lead. Returns the stored record as sent back by the relay.
    pub async fn create_lead(&self, lead: &LeadRequest) -> Result<serde_json::Value> {
        let response = self
            .http
            .post(self.config.endpoint("/leads"))
            .json(lead)
            .send()
            .await?;
        read_json(response).await
    }

    /// Open a support ticket. Returns the stored record.
    pub async fn create_ticket(&self, ticket: &TicketRequest) -> Result<serde_json::Value> {
        let response = self
            .http
            .post(self.config.endpoint("/support-tickets"))
            .json(ticket)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl RelayApi for RelayClient {
    async fn chat(&self, content: &str) -> Result<String> {
        debug!("POST /chat ({} chars)", content.len());
        let response = self
            .http
            .post(self.config.endpoint("/chat"))
            .json(&ChatRequest {
                role: "user",
                content,
            })
            .send()
            .await?;

        let reply: ChatReply = read_json(response).await?;
        reply
            .response
            .ok_or_else(|| ClientError::InvalidResponse("missing `response` field".to_string()))
    }

    async fn whatsapp_history(&self, phone: &str) -> Result<Vec<HistoryEntry>> {
        let response = self
            .http
            .get(self.config.endpoint(&format!("/whatsapp/history/{}", phone)))
            .send()
            .await?;

        let reply: HistoryReply = read_json(response).await?;
        Ok(reply.messages)
    }

    async fn whatsapp_send(&self, phone: &str, message: &str) -> Result<()> {
        let response = self
            .http
            .post(self.config.endpoint("/whatsapp/send"))
            .json(&WhatsAppSendRequest {
                phone_number: phone,
                message,
            })
            .send()
            .await?;

        check_status(response).await.map(|_| ())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
