use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Messaging capability used for every chat notification.
#[async_trait]
pub trait Notifier {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct TelegramBot {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelegramBot {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build Telegram client")?;
        Ok(Self {
            http,
            api_url: config.telegram_api_url.clone(),
            token: config.telegram_token.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramBot {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        let request = SendMessageRequest { chat_id, text };

        let resp = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            // The URL embeds the bot token; keep it out of the error chain.
            .map_err(|err| anyhow!("Telegram request failed: {}", err.without_url()))?;

        let status = resp.status();
        let body = resp.text().await.context("Telegram response read failed")?;
        let parsed: Option<TelegramResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(TelegramResponse { description, .. }) => Err(anyhow!(
                "Telegram API error: {} - {}",
                status,
                description.unwrap_or_else(|| "no description".to_string())
            )),
            None => Err(anyhow!("Telegram API error: {} - {}", status, body)),
        }
    }
}

/// Delivers `text`, logging and swallowing any failure.
///
/// Returns whether the message went out so callers can log it; the loop
/// never branches on it.
pub async fn notify<N>(notifier: &N, chat_id: &str, text: &str) -> bool
where
    N: Notifier + ?Sized,
{
    match notifier.send_message(chat_id, text).await {
        Ok(()) => {
            tracing::info!(chat_id, "Notification sent to Telegram chat");
            true
        }
        Err(err) => {
            tracing::error!(chat_id, error = %err, "Notification was not delivered to Telegram chat");
            false
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}
