//! Failure taxonomy of a single poll.
//!
//! The `Display` text of every variant ends up in the Telegram chat, so it is
//! written for the chat reader rather than for the log.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollError {
    /// Non-200 reply (`status` is set) or a transport failure (`status` is `None`).
    #[error("Недоступность API-сервиса! {detail}")]
    ServiceUnavailable { status: Option<u16>, detail: String },

    #[error("Некорректный ответ API-сервиса: {0}")]
    MalformedResponse(String),

    #[error("Отсутствуют данные о домашних работах!")]
    MissingData,

    #[error("Отсутствует поле {0} в данных о домашней работе!")]
    MissingField(&'static str),

    #[error("Отсутствие в ответе новых статусов!")]
    NoNewStatus,
}

impl PollError {
    pub fn http_status(status: u16) -> Self {
        PollError::ServiceUnavailable {
            status: Some(status),
            detail: format!("HTTPStatus: {}", status),
        }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        PollError::ServiceUnavailable {
            status: None,
            detail: err.to_string(),
        }
    }

    /// HTTP status observed by the fetch, if it got that far.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PollError::ServiceUnavailable { status, .. } => *status,
            _ => None,
        }
    }

    /// Every failure except a repeated status keeps the loop polling.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, PollError::NoNewStatus)
    }
}
