//! Client configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default relay base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default key the primary chat is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "chat_messages";

/// Settings shared by every chat surface.
///
/// Passed explicitly into each session at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Relay base URL, without a trailing slash.
    pub api_url: String,
    /// Directory holding persisted sessions.
    pub storage_dir: PathBuf,
    /// Key the primary chat session is stored under.
    pub storage_key: String,
    /// Upper bound for any single relay request.
    pub request_timeout: Duration,
    /// Wait between a WhatsApp send and the history refresh.
    pub refresh_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_dir: PathBuf::from(".support-chat"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            request_timeout: Duration::from_secs(30),
            refresh_delay: Duration::from_millis(2000),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SUPPORT_API_URL` | `http://localhost:8000` |
    /// | `SUPPORT_STORAGE_DIR` | `.support-chat` |
    /// | `SUPPORT_STORAGE_KEY` | `chat_messages` |
    /// | `SUPPORT_REQUEST_TIMEOUT_SECS` | `30` |
    /// | `SUPPORT_REFRESH_DELAY_MS` | `2000` |
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = env::var("SUPPORT_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.api_url);

        let storage_dir = env::var("SUPPORT_STORAGE_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_dir);

        let storage_key = env::var("SUPPORT_STORAGE_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.storage_key);

        let request_timeout = env::var("SUPPORT_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let refresh_delay = env::var("SUPPORT_REFRESH_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.refresh_delay);

        Self {
            storage_dir,
            storage_key,
            request_timeout,
            refresh_delay,
            ..Self::default()
        }
        .with_api_url(api_url)
    }

    /// Point the client at a different relay.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL for a relay path such as `/chat`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}
