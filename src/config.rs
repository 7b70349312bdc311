//! Runtime configuration, read once at start-up.

use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

const DEFAULT_RETRY_SECS: u64 = 600;
const DEFAULT_ERROR_RETRY_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const REQUIRED: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Where the cursor starts on the first poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCursor {
    /// Fixed unix timestamp.
    At(i64),
    /// Current time at start-up.
    Now,
}

impl StartCursor {
    pub fn resolve(self) -> i64 {
        match self {
            StartCursor::At(timestamp) => timestamp,
            StartCursor::Now => chrono::Utc::now().timestamp(),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub endpoint: String,
    pub telegram_api_url: String,
    /// Sleep after a successful poll.
    pub retry_interval: Duration,
    /// Sleep after a failed poll.
    pub error_retry_interval: Duration,
    pub request_timeout: Duration,
    pub start_cursor: StartCursor,
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &REDACTED)
            .field("telegram_token", &REDACTED)
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_interval", &self.retry_interval)
            .field("error_retry_interval", &self.error_retry_interval)
            .field("request_timeout", &self.request_timeout)
            .field("start_cursor", &self.start_cursor)
            .finish()
    }
}

impl Config {
    pub fn new(practicum_token: String, telegram_token: String, telegram_chat_id: String) -> Self {
        Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            retry_interval: Duration::from_secs(DEFAULT_RETRY_SECS),
            error_retry_interval: Duration::from_secs(DEFAULT_ERROR_RETRY_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            start_cursor: StartCursor::At(0),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Required:
    /// - PRACTICUM_TOKEN
    /// - TELEGRAM_TOKEN
    /// - TELEGRAM_CHAT_ID
    ///
    /// Optional:
    /// - PRACTICUM_ENDPOINT, TELEGRAM_API_URL
    /// - RETRY_TIME, ERROR_RETRY_TIME, REQUEST_TIMEOUT (seconds)
    /// - FROM_DATE (unix timestamp or `now`, default 0)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let missing: Vec<&str> = REQUIRED.iter().copied().filter(|key| read(*key).is_none()).collect();
        if !missing.is_empty() {
            bail!("Missing required environment variables: {}", missing.join(", "));
        }

        let secret = |key: &str| read(key).ok_or_else(|| anyhow!("{} must be set", key));
        let mut config = Self::new(
            secret("PRACTICUM_TOKEN")?,
            secret("TELEGRAM_TOKEN")?,
            secret("TELEGRAM_CHAT_ID")?,
        );

        if let Some(endpoint) = read("PRACTICUM_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(url) = read("TELEGRAM_API_URL") {
            config.telegram_api_url = url.trim_end_matches('/').to_string();
        }

        let seconds = |key: &str, default: u64| -> Result<Duration> {
            match read(key) {
                Some(raw) => raw
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| anyhow!("{} must be a whole number of seconds, got {:?}", key, raw)),
                None => Ok(Duration::from_secs(default)),
            }
        };
        config.retry_interval = seconds("RETRY_TIME", DEFAULT_RETRY_SECS)?;
        config.error_retry_interval = seconds("ERROR_RETRY_TIME", DEFAULT_ERROR_RETRY_SECS)?;
        config.request_timeout = seconds("REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        if let Some(raw) = read("FROM_DATE") {
            config.start_cursor = if raw.eq_ignore_ascii_case("now") {
                StartCursor::Now
            } else {
                let timestamp = raw
                    .parse::<i64>()
                    .map_err(|_| anyhow!("FROM_DATE must be a unix timestamp or \"now\", got {:?}", raw))?;
                StartCursor::At(timestamp)
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("PRACTICUM_ENDPOINT", &self.endpoint), ("TELEGRAM_API_URL", &self.telegram_api_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("{} must start with http:// or https://", name);
            }
        }
        if self.retry_interval.is_zero() {
            bail!("RETRY_TIME must be greater than 0");
        }
        if self.error_retry_interval.is_zero() {
            bail!("ERROR_RETRY_TIME must be greater than 0");
        }
        if self.request_timeout.is_zero() {
            bail!("REQUEST_TIMEOUT must be greater than 0");
        }
        Ok(())
    }
}
