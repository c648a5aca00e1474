use crate::error::LLMError;
use crate::types::{Response, Usage};

use super::types::OllamaChatResponse;

/// Maps a blocking `/api/chat` body, surfacing in-band errors first.
pub(crate) fn map_response(
    response: OllamaChatResponse,
    model: &str,
) -> Result<Response, LLMError> {
    if let Some(error) = response.in_band_error() {
        tracing::warn!(provider = "ollama_chat", %error, "in-band error in success response");
        return Err(LLMError::provider(
            "ollama_chat",
            format!("Ollama error: {error}"),
        ));
    }

    Ok(Response {
        content: response
            .message
            .and_then(|message| message.content)
            .unwrap_or_default(),
        model: model.to_string(),
        usage: Usage {
            prompt_tokens: response.prompt_eval_count.unwrap_or(0),
            completion_tokens: response.eval_count.unwrap_or(0),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> OllamaChatResponse {
        serde_json::from_str(body).expect("valid response")
    }

    #[test]
    fn maps_message_and_eval_counts() {
        let body = r#"{
  "model": "llama3.2",
  "created_at": "2024-07-22T20:33:28.123648Z",
  "message": { "role": "assistant", "content": "Rayleigh scattering." },
  "done_reason": "stop",
  "done": true,
  "total_duration": 1152130126,
  "prompt_eval_count": 26,
  "eval_count": 8
}"#;
        let response = map_response(parse(body), "llama3.2").expect("response");
        assert_eq!(response.content, "Rayleigh scattering.");
        assert_eq!(response.model, "llama3.2");
        assert_eq!(response.usage.prompt_tokens, 26);
        assert_eq!(response.usage.completion_tokens, 8);
    }

    #[test]
    fn in_band_error_is_a_provider_error() {
        let err = map_response(parse(r#"{"error":"model 'nope' not found"}"#), "nope")
            .expect_err("should fail");
        match err {
            LLMError::Provider {
                provider,
                status,
                message,
            } => {
                assert_eq!(provider, "ollama_chat");
                assert_eq!(status, None);
                assert_eq!(message, "Ollama error: model 'nope' not found");
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn empty_error_field_and_missing_counts_are_tolerated() {
        let response =
            map_response(parse(r#"{"error":"","done":true}"#), "llama3.2").expect("response");
        assert_eq!(response.content, "");
        assert_eq!(response.usage, Usage::default());
    }
}
