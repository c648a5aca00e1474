use serde::Deserialize;

use crate::error::{LLMError, status_error};

/// Parses error responses returned by the Chat Completions API.
///
/// The vendor message comes from `error.message`; bodies that are not JSON or lack
/// that field are reported verbatim.
pub(crate) fn parse_openai_error(status: u16, body: &str) -> LLMError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<InnerError>,
    }
    #[derive(Deserialize)]
    struct InnerError {
        message: Option<String>,
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|error| error.message)
        .unwrap_or_else(|| body.to_string());

    status_error("openai_chat", status, &message, |status, message| {
        format!("API error ({status}): {message}")
    })
}
