//! Configuration types for the WhatsSMS gateway.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::WhatsSmsError;

/// Default WhatsSMS API base URL.
pub const DEFAULT_API_URL: &str = "https://app.whatssms.io/api";

/// Configuration for talking to WhatsSMS.io.
#[derive(Clone)]
pub struct WhatsSmsConfig {
    /// API base URL (e.g., "https://app.whatssms.io/api").
    pub api_url: String,
    /// API secret sent with every request.
    pub secret: String,
    /// WhatsApp account identifier the bot sends from.
    pub account_id: String,
    /// The bot's own phone number.
    pub bot_phone: String,
    /// Number that receives team alerts.
    pub team_number: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl WhatsSmsConfig {
    /// Create a configuration with the default API URL and timeout.
    pub fn new(
        secret: impl Into<String>,
        account_id: impl Into<String>,
        bot_phone: impl Into<String>,
        team_number: impl Into<String>,
    ) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            secret: secret.into(),
            account_id: account_id.into(),
            bot_phone: bot_phone.into(),
            team_number: team_number.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Point the client at a different API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `WHATSAPP_API_URL` | API base URL | `https://app.whatssms.io/api` |
    /// | `ACCESS_TOKEN` | API secret | (required) |
    /// | `WHATSAPP_ACCOUNT_ID` | Sending account | (required) |
    /// | `BOT_PHONE_NUMBER` | Bot number | (required) |
    /// | `TEAM_NUMBER` | Team alert recipient | (required) |
    pub fn from_env() -> Result<Self, WhatsSmsError> {
        let mut missing = Vec::new();
        let mut require = |name: &'static str| match env::var(name) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let secret = require("ACCESS_TOKEN");
        let account_id = require("WHATSAPP_ACCOUNT_ID");
        let bot_phone = require("BOT_PHONE_NUMBER");
        let team_number = require("TEAM_NUMBER");

        if !missing.is_empty() {
            return Err(WhatsSmsError::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let config = Self::new(secret, account_id, bot_phone, team_number);
        Ok(match env::var("WHATSAPP_API_URL") {
            Ok(url) if !url.trim().is_empty() => config.with_api_url(url),
            _ => config,
        })
    }

    /// Get the send endpoint URL.
    pub fn send_url(&self) -> String {
        format!("{}/send/whatsapp", self.api_url)
    }
}

impl fmt::Debug for WhatsSmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhatsSmsConfig")
            .field("api_url", &self.api_url)
            .field("secret", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("bot_phone", &self.bot_phone)
            .field("team_number", &self.team_number)
            .field("timeout", &self.timeout)
            .finish()
    }
}
