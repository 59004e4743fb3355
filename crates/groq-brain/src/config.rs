//! Configuration for GroqBrain.

use std::env;
use std::fmt;
use std::time::Duration;

use brain_core::BrainError;

/// Default chat completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model name.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Configuration for GroqBrain.
#[derive(Clone)]
pub struct GroqBrainConfig {
    /// Full chat completions URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Optional system prompt, sent as the first message.
    pub system_prompt: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GroqBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            max_tokens: Some(200),
            temperature: Some(0.7),
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for GroqBrainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqBrainConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GroqBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GROQ_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `GROQ_API_URL` - Completions URL (default: Groq's OpenAI-compatible endpoint)
    /// - `GROQ_MODEL` - Model name (default: llama-3.1-8b-instant)
    /// - `GROQ_SYSTEM_PROMPT` - System prompt
    /// - `GROQ_MAX_TOKENS` - Max tokens (default: 200)
    /// - `GROQ_TEMPERATURE` - Temperature (default: 0.7)
    /// - `GROQ_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("GROQ_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BrainError::Configuration("GROQ_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        let api_url = env::var("GROQ_API_URL").unwrap_or(defaults.api_url);
        let model = env::var("GROQ_MODEL").unwrap_or(defaults.model);
        let system_prompt = env::var("GROQ_SYSTEM_PROMPT").ok();

        let max_tokens = env::var("GROQ_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let temperature = env::var("GROQ_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let timeout = env::var("GROQ_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt,
            max_tokens,
            temperature,
            timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GroqBrainConfigBuilder {
        GroqBrainConfigBuilder::default()
    }

    /// Derive a config with a different system prompt and temperature.
    ///
    /// The relay uses this to split one environment config into the web chat
    /// and WhatsApp profiles.
    pub fn with_profile(&self, system_prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            system_prompt: Some(system_prompt.into()),
            temperature: Some(temperature),
            ..self.clone()
        }
    }
}

/// Builder for GroqBrainConfig.
#[derive(Debug, Default)]
pub struct GroqBrainConfigBuilder {
    config: GroqBrainConfig,
}

impl GroqBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the completions URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GroqBrainConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GroqBrainConfig::default();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert!(config.system_prompt.is_none());
        assert_eq!(config.max_tokens, Some(200));
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_all_options() {
        let config = GroqBrainConfig::builder()
            .api_key("my-key")
            .api_url("http://localhost:9999/v1/chat/completions")
            .model("llama-3.3-70b-versatile")
            .system_prompt("You are helpful")
            .max_tokens(500)
            .temperature(0.3)
            .timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.api_url, "http://localhost:9999/v1/chat/completions");
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.system_prompt, Some("You are helpful".to_string()));
        assert_eq!(config.max_tokens, Some(500));
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_with_profile_keeps_credentials() {
        let base = GroqBrainConfig::builder().api_key("k").model("m").build();
        let chat = base.with_profile("be brief", 0.3);

        assert_eq!(chat.api_key, "k");
        assert_eq!(chat.model, "m");
        assert_eq!(chat.system_prompt.as_deref(), Some("be brief"));
        assert_eq!(chat.temperature, Some(0.3));
        assert!(base.system_prompt.is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GroqBrainConfig::builder().api_key("super-secret").build();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_groq_vars() {
            for var in [
                "GROQ_API_KEY",
                "GROQ_API_URL",
                "GROQ_MODEL",
                "GROQ_SYSTEM_PROMPT",
                "GROQ_MAX_TOKENS",
                "GROQ_TEMPERATURE",
                "GROQ_TIMEOUT_SECS",
            ] {
                std::env::remove_var(var);
            }
        }

        // Missing API key should error
        clear_all_groq_vars();
        match GroqBrainConfig::from_env() {
            Err(BrainError::Configuration(msg)) => assert!(msg.contains("GROQ_API_KEY")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        // Only API key set, defaults used
        clear_all_groq_vars();
        std::env::set_var("GROQ_API_KEY", "test-env-key");
        let config = GroqBrainConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.max_tokens, Some(200));

        // All vars set
        clear_all_groq_vars();
        std::env::set_var("GROQ_API_KEY", "full-test-key");
        std::env::set_var("GROQ_API_URL", "https://test.api.com/v1/chat/completions");
        std::env::set_var("GROQ_MODEL", "llama-3.3-70b-versatile");
        std::env::set_var("GROQ_MAX_TOKENS", "500");
        std::env::set_var("GROQ_TEMPERATURE", "0.3");
        std::env::set_var("GROQ_TIMEOUT_SECS", "10");
        let config = GroqBrainConfig::from_env().unwrap();
        assert_eq!(config.api_url, "https://test.api.com/v1/chat/completions");
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.max_tokens, Some(500));
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.timeout, Duration::from_secs(10));

        clear_all_groq_vars();
    }
}
