use std::env;
use std::time::Duration;
use anyhow::{Result, Context};

pub const DEFAULT_XAI_BASE_URL: &str = "https://api.x.ai";
pub const DEFAULT_XAI_MODEL: &str = "grok-4-1-fast";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
// hourly, UTC
pub const DEFAULT_SCHEDULE: &str = "0 0 * * * *";

#[derive(Debug, Clone)]
pub struct XaiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for XaiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_XAI_BASE_URL.to_string(),
            model: DEFAULT_XAI_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub xai: XaiConfig,
    pub schedule: String,
    pub http_bind_addr: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_url = var("DATABASE_URL")
            .context("DATABASE_URL must be set")?;

        let xai = XaiConfig {
            api_key: var("XAI_API_KEY"),
            base_url: var("XAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_XAI_BASE_URL.to_string()),
            model: var("XAI_MODEL").unwrap_or_else(|| DEFAULT_XAI_MODEL.to_string()),
            timeout: Duration::from_secs(
                var("XAI_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        };

        Ok(Config {
            database_url,
            xai,
            schedule: var("TREND_SCHEDULE").unwrap_or_else(|| DEFAULT_SCHEDULE.to_string()),
            http_bind_addr: var("HTTP_BIND_ADDR"),
        })
    }

    pub fn require_xai_api_key(&self) -> Result<&String> {
        self.xai
            .api_key
            .as_ref()
            .context("XAI_API_KEY must be set")
    }
}
