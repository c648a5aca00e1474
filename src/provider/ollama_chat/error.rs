use serde::Deserialize;

use crate::error::{LLMError, status_error};

/// Parses a non-success `/api/chat` response.
///
/// Ollama reports failures as `{"error": "..."}` with a plain string.
pub(crate) fn parse_ollama_error(status: u16, body: &str) -> LLMError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .unwrap_or_else(|| body.to_string());

    status_error("ollama_chat", status, &message, |status, message| {
        format!("Ollama error ({status}): {message}")
    })
}

/// Message used when the local service refuses connections.
pub(crate) fn connection_hint(endpoint: &str) -> String {
    format!("Could not connect to Ollama at {endpoint}. Is Ollama running?")
}
