//! Validation of the status API reply and formatting of the chat message.

use serde_json::Value;

use crate::error::PollError;
use crate::models::{HomeworkStatus, Submission};

const EMPTY_STATUS: &str = "empty_status";

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Returns the first submission of a reply; later ones are ignored.
pub fn validate_response(response: &Value) -> Result<&Value, PollError> {
    let map = response
        .as_object()
        .ok_or_else(|| PollError::MalformedResponse("ответ не является словарём".to_string()))?;

    let homeworks = match map.get("homeworks") {
        Some(value) if !is_blank(value) => value,
        _ => {
            tracing::error!("Response carries no homework entries");
            return Err(PollError::MissingData);
        }
    };

    let first = homeworks.as_array().and_then(|items| items.first()).ok_or_else(|| {
        PollError::MalformedResponse("данные о домашних работах не являются списком".to_string())
    })?;

    Ok(first)
}

pub fn extract_submission(record: &Value) -> Result<Submission, PollError> {
    let map = record.as_object().ok_or_else(|| {
        PollError::MalformedResponse("данные о домашней работе не являются словарём".to_string())
    })?;

    let name = map
        .get("homework_name")
        .map(render)
        .ok_or(PollError::MissingField("homework_name"))?;
    let status = map
        .get("status")
        .map(render)
        .unwrap_or_else(|| EMPTY_STATUS.to_string());

    Ok(Submission { name, status })
}

/// Builds the chat message for a submission record.
///
/// An unrecognised status code is not an error: it produces a fallback
/// message naming the code.
pub fn format_status(record: &Value) -> Result<String, PollError> {
    let submission = extract_submission(record)?;

    match HomeworkStatus::from_code(&submission.status) {
        Some(status) => Ok(format!(
            "Изменился статус проверки работы \"{}\". {}",
            submission.name,
            status.verdict()
        )),
        None => {
            let message = format!("Неизвестный статус: {}", submission.status);
            tracing::error!(status = %submission.status, homework = %submission.name, "Unknown homework status");
            Ok(message)
        }
    }
}

/// Server-reported `current_date`, when it is present and integral.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}
