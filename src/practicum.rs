use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::Config;
use crate::error::PollError;

/// Source of homework status replies.
#[async_trait]
pub trait StatusSource {
    /// One request for updates since `from_date`; never retries.
    async fn fetch(&self, from_date: i64) -> Result<Value, PollError>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build status API client")?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            token: config.practicum_token.clone(),
        })
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, PollError> {
        tracing::debug!(from_date, endpoint = %self.endpoint, "Requesting homework statuses");

        let resp = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "Status API request failed");
                PollError::transport(err)
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            tracing::error!(status = status.as_u16(), "Status API returned non-OK status");
            return Err(PollError::http_status(status.as_u16()));
        }

        let body = resp.text().await.map_err(PollError::transport)?;
        let parsed: Value = serde_json::from_str(&body).map_err(|err| {
            PollError::MalformedResponse(format!("тело ответа не является JSON ({})", err))
        })?;

        tracing::info!("Received status API response");
        Ok(parsed)
    }
}
