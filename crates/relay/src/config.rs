//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Relay server configuration.
///
/// Groq and WhatsSMS settings are loaded by their own crates.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Browser origin allowed by CORS.
    pub cors_origin: String,
    /// Shared secret expected on inbound webhooks.
    pub webhook_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `RELAY_ADDR` | Server bind address | `127.0.0.1:8000` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:support.db?mode=rwc` |
    /// | `CORS_ORIGIN` | Allowed browser origin | `http://localhost:3000` |
    /// | `WEBHOOK_SECRET` | Webhook shared secret | (unset) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("RELAY_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:support.db?mode=rwc".to_string());

        let cors_origin = env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        if cors_origin.parse::<axum::http::HeaderValue>().is_err() {
            return Err(ConfigError::InvalidOrigin(cors_origin));
        }

        let webhook_secret = env::var("WEBHOOK_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty());

        Ok(Self {
            addr,
            database_url,
            cors_origin,
            webhook_secret,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid RELAY_ADDR format")]
    InvalidAddr,

    #[error("Invalid CORS_ORIGIN: {0}")]
    InvalidOrigin(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        const VARS: [&str; 4] = ["RELAY_ADDR", "DATABASE_URL", "CORS_ORIGIN", "WEBHOOK_SECRET"];
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8000");
        assert_eq!(config.database_url, "sqlite:support.db?mode=rwc");
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert!(config.webhook_secret.is_none());

        env::set_var("WEBHOOK_SECRET", "   ");
        assert!(Config::from_env().unwrap().webhook_secret.is_none());

        env::set_var("WEBHOOK_SECRET", "hook");
        env::set_var("RELAY_ADDR", "0.0.0.0:9000");
        let config = Config::from_env().unwrap();
        assert_eq!(config.webhook_secret.as_deref(), Some("hook"));
        assert_eq!(config.addr.port(), 9000);

        env::set_var("RELAY_ADDR", "not an addr");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidAddr)));

        for var in VARS {
            env::remove_var(var);
        }
    }
}
