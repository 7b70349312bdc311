mod config;
mod error;
mod logger;
mod models;
mod poller;
mod practicum;
mod status;
mod telegram;
#[cfg(test)]
mod test_support;

use anyhow::Result;

use crate::config::Config;
use crate::poller::Poller;
use crate::practicum::PracticumClient;
use crate::telegram::TelegramBot;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "Required configuration is missing, refusing to start");
            return Err(err.context("Configuration error"));
        }
    };

    tracing::info!(
        endpoint = %config.endpoint,
        chat_id = %config.telegram_chat_id,
        retry_secs = config.retry_interval.as_secs(),
        error_retry_secs = config.error_retry_interval.as_secs(),
        "Starting homework status bot"
    );

    let source = PracticumClient::from_config(&config)?;
    let bot = TelegramBot::from_config(&config)?;
    let mut poller = Poller::new(&config, source, bot);

    poller.announce_start().await;
    if let Err(err) = poller.run().await {
        tracing::error!(
            error = %err,
            retryable = err.is_retryable(),
            cursor = poller.cursor(),
            "Polling loop terminated"
        );
        return Err(anyhow::Error::new(err).context("Homework status bot stopped"));
    }

    Ok(())
}
