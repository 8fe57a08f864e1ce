//! services/web/src/config.rs
//!
//! Application configuration, loaded once from environment variables at
//! startup. A `.env` file is honored for local development.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::Level;

/// A configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// A rate-limit policy of the form `"<count> per <second|minute|hour|day>"`.
///
/// Enforcement is delegated to the deployment (reverse proxy / limiter
/// sidecar); the policy is parsed here so a bad value fails at startup
/// rather than in production config drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub requests: u32,
    pub per: Duration,
}

impl std::str::FromStr for RateLimitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(count), Some("per"), Some(unit), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("'{s}' is not of the form '<count> per <unit>'"));
        };
        let requests: u32 = count
            .parse()
            .map_err(|_| format!("'{count}' is not a valid request count"))?;
        let per = match unit {
            "second" => Duration::from_secs(1),
            "minute" => Duration::from_secs(60),
            "hour" => Duration::from_secs(60 * 60),
            "day" => Duration::from_secs(60 * 60 * 24),
            other => return Err(format!("'{other}' is not a valid rate-limit unit")),
        };
        Ok(Self { requests, per })
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    /// Session-signing secret. Kept even though sessions are server-side
    /// random ids, so deployments can rotate it without a schema change.
    pub secret_key: String,
    pub deepseek_api_key: String,
    pub completion_endpoint: String,
    pub completion_model: String,
    pub request_timeout: Duration,
    pub rate_limit: RateLimitPolicy,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Looks for a `.env` file in the current directory for development;
    /// skipped under test so tests stay hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let secret_key =
            std::env::var("SECRET_KEY").unwrap_or_else(|_| "dev-key-123".to_string());

        let deepseek_api_key = std::env::var("DEEPSEEK_API_KEY")
            .map_err(|_| ConfigError::MissingVar("DEEPSEEK_API_KEY".to_string()))?;

        let completion_endpoint = std::env::var("COMPLETION_ENDPOINT")
            .unwrap_or_else(|_| "https://api.deepseek.com/v1/chat/completions".to_string());

        let completion_model =
            std::env::var("COMPLETION_MODEL").unwrap_or_else(|_| "deepseek-chat".to_string());

        let timeout_str =
            std::env::var("COMPLETION_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string());
        let timeout_secs: u64 = timeout_str.parse().map_err(|_| {
            ConfigError::InvalidValue(
                "COMPLETION_TIMEOUT_SECS".to_string(),
                format!("'{timeout_str}' is not a number of seconds"),
            )
        })?;
        let request_timeout = Duration::from_secs(timeout_secs);

        let rate_limit_str =
            std::env::var("RATELIMIT_DEFAULT").unwrap_or_else(|_| "30 per hour".to_string());
        let rate_limit = rate_limit_str
            .parse::<RateLimitPolicy>()
            .map_err(|e| ConfigError::InvalidValue("RATELIMIT_DEFAULT".to_string(), e))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{log_level_str}' is not a valid log level"),
            )
        })?;

        Ok(Self {
            bind_address,
            database_url,
            secret_key,
            deepseek_api_key,
            completion_endpoint,
            completion_model,
            request_timeout,
            rate_limit,
            log_level,
        })
    }
}
