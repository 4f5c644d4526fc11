use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Process configuration. Built once in `main` and handed to the
/// components that need it.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub request_timeout: Duration,
    pub port: u16,
}

impl Config {
    /// Load from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Ok(Config {
            openai_api_key: get_env("OPENAI_API_KEY")?,
            openai_base_url: get_env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            model: get_env_or_default("OPENAI_MODEL", DEFAULT_MODEL),
            temperature: parse_env_or("QUERYCRAFT_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            request_timeout: Duration::from_secs(parse_env_or("QUERYCRAFT_TIMEOUT_SECS", 30u64)?),
            port: parse_env_or("PORT", 8080u16)?,
        })
    }

    pub fn new(openai_api_key: impl Into<String>) -> Self {
        Config {
            openai_api_key: openai_api_key.into(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(30),
            port: 8080,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai_base_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn get_env(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("Missing required environment variable: {key}"))
}

/// Unset and blank variables are treated alike.
fn get_env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|raw| !raw.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_env_non_empty(key).unwrap_or_else(|| default.to_string())
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get_env_non_empty(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
