//! The polling loop.
//!
//! Every tick runs fetch, validate and format in order and ends in one of three
//! outcomes. A changed status is announced and the loop sleeps the normal
//! interval. A failure is announced once per distinct message and the loop
//! sleeps the shorter error interval. An unchanged status stops the loop.

use std::time::Duration;

use crate::config::Config;
use crate::error::PollError;
use crate::practicum::StatusSource;
use crate::status::{current_date, format_status, validate_response};
use crate::telegram::{notify, Notifier};

pub const STARTED_MESSAGE: &str = "Бот запущен";
const FAILURE_PREFIX: &str = "Сбой в работе программы";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// New status message, notified.
    StatusChanged,
    /// Same status message as last time; nothing sent.
    StatusUnchanged,
    /// Some step failed; the error was notified unless it repeats.
    Failed,
}

pub struct Poller<S, N> {
    source: S,
    notifier: N,
    chat_id: String,
    retry_interval: Duration,
    error_retry_interval: Duration,
    cursor: i64,
    last_status: String,
    last_error: String,
}

impl<S, N> Poller<S, N>
where
    S: StatusSource,
    N: Notifier,
{
    pub fn new(config: &Config, source: S, notifier: N) -> Self {
        Self {
            source,
            notifier,
            chat_id: config.telegram_chat_id.clone(),
            retry_interval: config.retry_interval,
            error_retry_interval: config.error_retry_interval,
            cursor: config.start_cursor.resolve(),
            last_status: String::new(),
            last_error: String::new(),
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub async fn announce_start(&self) {
        tracing::debug!(chat_id = %self.chat_id, "Announcing start");
        notify(&self.notifier, &self.chat_id, STARTED_MESSAGE).await;
    }

    /// Polls until the reported status stops changing.
    ///
    /// Only returns with `PollError::NoNewStatus`; every other failure is
    /// notified and retried.
    pub async fn run(&mut self) -> Result<(), PollError> {
        loop {
            let pause = match self.tick().await {
                TickOutcome::StatusChanged => self.retry_interval,
                TickOutcome::Failed => self.error_retry_interval,
                TickOutcome::StatusUnchanged => {
                    tracing::error!(cursor = self.cursor, "No new homework status, stopping");
                    return Err(PollError::NoNewStatus);
                }
            };
            tracing::debug!(sleep_secs = pause.as_secs(), "Sleeping until next poll");
            tokio::time::sleep(pause).await;
        }
    }

    pub async fn tick(&mut self) -> TickOutcome {
        match self.poll_once().await {
            Ok(message) if message != self.last_status => {
                notify(&self.notifier, &self.chat_id, &message).await;
                self.last_status = message;
                TickOutcome::StatusChanged
            }
            Ok(_) => {
                tracing::debug!("Response carries no new status");
                TickOutcome::StatusUnchanged
            }
            Err(err) => {
                debug_assert!(err.is_retryable(), "poll step returned a terminal error");
                let message = format!("{}: {}", FAILURE_PREFIX, err);
                if message != self.last_error {
                    notify(&self.notifier, &self.chat_id, &message).await;
                    self.last_error = message.clone();
                }
                tracing::error!(error = %err, status = ?err.status_code(), "{}", message);
                TickOutcome::Failed
            }
        }
    }

    async fn poll_once(&mut self) -> Result<String, PollError> {
        let response = self.source.fetch(self.cursor).await?;
        let record = validate_response(&response)?;
        let message = format_status(record)?;

        if let Some(next) = current_date(&response) {
            self.cursor = next;
        }
        tracing::debug!(cursor = self.cursor, "Poll succeeded");
        Ok(message)
    }
}
