//! WhatsSMS HTTP client.

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::WhatsSmsConfig;
use crate::error::WhatsSmsError;
use crate::phone::normalize_to_e164;
use crate::types::{SendForm, SendReceipt, SendResponse};

/// Client for the WhatsSMS.io send API.
#[derive(Clone)]
pub struct WhatsSmsClient {
    http: Client,
    config: WhatsSmsConfig,
}

impl WhatsSmsClient {
    /// Build a client from configuration.
    pub fn new(config: WhatsSmsConfig) -> Result<Self, WhatsSmsError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(WhatsSmsError::Http)?;

        Ok(Self { http, config })
    }

    /// Build a client from environment variables.
    pub fn from_env() -> Result<Self, WhatsSmsError> {
        Self::new(WhatsSmsConfig::from_env()?)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &WhatsSmsConfig {
        &self.config
    }

    /// Number that receives team alerts.
    pub fn team_number(&self) -> &str {
        &self.config.team_number
    }

    /// Send a text message.
    ///
    /// The recipient is normalised to E.164 first. The message counts as
    /// delivered only when the gateway answers HTTP 200 with a JSON
    /// `status` of 200.
    pub async fn send_text(
        &self,
        recipient: &str,
        message: &str,
    ) -> Result<SendReceipt, WhatsSmsError> {
        let recipient = normalize_to_e164(recipient);
        if recipient.is_empty() {
            return Err(WhatsSmsError::InvalidRecipient(recipient));
        }

        let form = SendForm::text(
            &self.config.secret,
            &self.config.account_id,
            &recipient,
            message,
        );

        debug!(recipient = %recipient, chars = message.chars().count(), "Sending WhatsApp message");

        let resp = self
            .http
            .post(self.config.send_url())
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            warn!(recipient = %recipient, status = status.as_u16(), "WhatsSMS send failed");
            return Err(WhatsSmsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SendResponse = serde_json::from_str(&body)
            .map_err(|e| WhatsSmsError::InvalidResponse(format!("{}: {}", e, body)))?;

        if !parsed.is_accepted() {
            warn!(recipient = %recipient, body = %body, "WhatsSMS rejected message");
            return Err(WhatsSmsError::Rejected { recipient, body });
        }

        info!(recipient = %recipient, "WhatsApp message sent");
        Ok(SendReceipt {
            recipient,
            detail: parsed.message,
        })
    }
}

impl std::fmt::Debug for WhatsSmsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsSmsClient")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WhatsSmsClient {
        let config = WhatsSmsConfig::new("sekret", "acct-7", "+923000000000", "+923111111111")
            .with_api_url(format!("{}/api", server.uri()));
        WhatsSmsClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_send_text_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/send/whatsapp"))
            .and(body_string_contains("secret=sekret"))
            .and(body_string_contains("account=acct-7"))
            .and(body_string_contains("recipient=%2B923001112233"))
            .and(body_string_contains("type=text"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": 200, "message": "Queued"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let receipt = client_for(&server)
            .send_text("03001112233", "Hello there")
            .await
            .unwrap();

        assert_eq!(receipt.recipient, "+923001112233");
        assert_eq!(receipt.detail.as_deref(), Some("Queued"));
    }

    #[tokio::test]
    async fn test_send_text_rejected_by_json_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/send/whatsapp"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": 400, "message": "Invalid account"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_text("+12345678900", "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, WhatsSmsError::Rejected { ref recipient, .. } if recipient == "+12345678900"));
    }

    #[tokio::test]
    async fn test_send_text_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server).send_text("+12345678900", "hi").await.unwrap_err();
        assert!(matches!(err, WhatsSmsError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_send_text_string_status_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "200"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).send_text("+12345678900", "hi").await.unwrap_err();
        assert!(matches!(err, WhatsSmsError::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_empty_recipient_is_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server).send_text("", "hi").await.unwrap_err();
        assert!(matches!(err, WhatsSmsError::InvalidRecipient(_)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = WhatsSmsConfig::new("sekret", "acct", "+1", "+2");
        let client = WhatsSmsClient::new(config).unwrap();
        assert!(!format!("{:?}", client).contains("sekret"));
    }
}
