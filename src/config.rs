use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,

    // API settings
    pub api_host: String,
    pub api_port: u16,
    pub request_body_limit_bytes: usize,

    // Rate limiting
    pub disable_rate_limiting: bool,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,

    // Defaults applied to incoming documents
    pub default_email: String,

    // Application metadata
    pub deployment: Deployment,
    pub log_format: LogFormat,
}

/// Read `key`, falling back to `default` when unset or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,

            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env_or("API_PORT", 8000),
            request_body_limit_bytes: env_or("REQUEST_BODY_LIMIT_BYTES", 64 * 1024),

            disable_rate_limiting: env_or("DISABLE_RATE_LIMITING", false),
            rate_limit_per_second: env_or("RATE_LIMIT_PER_SECOND", 5),
            rate_limit_burst: env_or("RATE_LIMIT_BURST", 30),

            default_email: env::var("DEFAULT_EMAIL")
                .unwrap_or_else(|_| "no-email@example.com".to_string()),

            deployment: Deployment::parse(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
            log_format,
        })
    }

    /// Defaults for a local instance against `database_url`, rate limiting off.
    #[must_use]
    pub fn local(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            api_host: "127.0.0.1".to_string(),
            api_port: 8000,
            request_body_limit_bytes: 64 * 1024,
            disable_rate_limiting: true,
            rate_limit_per_second: 5,
            rate_limit_burst: 30,
            default_email: "no-email@example.com".to_string(),
            deployment: Deployment::Local,
            log_format: LogFormat::Text,
        }
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
