use crate::error::{LLMError, status_error};

use super::types::AnthropicErrorBody;

/// Extracts `error.message` from an Anthropic error envelope.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<AnthropicErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|error| error.message)
}

/// Parses error responses returned by the Anthropic Messages API.
pub(crate) fn parse_anthropic_error(status: u16, body: &str) -> LLMError {
    let message = error_message(body).unwrap_or_else(|| body.to_string());
    status_error("anthropic_messages", status, &message, |status, message| {
        format!("API error ({status}): {message}")
    })
}
