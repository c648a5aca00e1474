use crate::error::LLMError;
use crate::http::HttpBodyStream;
use crate::provider::ChunkStream;
use crate::stream::{LineDecoder, LineStream};
use crate::types::Chunk;

use super::types::OllamaChatResponse;

pub(crate) fn create_stream(body: HttpBodyStream, provider: &'static str) -> ChunkStream {
    Box::pin(LineStream::new(body, OllamaNdjsonDecoder, provider))
}

/// Decodes Ollama's newline-delimited JSON stream, one object per line.
///
/// A line with `"done": true` ends the stream; any content it carries is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct OllamaNdjsonDecoder;

impl LineDecoder for OllamaNdjsonDecoder {
    fn decode_line(&mut self, line: &str) -> Result<Option<Chunk>, LLMError> {
        let parsed: OllamaChatResponse = serde_json::from_str(line).map_err(|err| {
            LLMError::provider("ollama_chat", format!("failed to parse stream line: {err}"))
        })?;

        if let Some(error) = parsed.in_band_error() {
            tracing::warn!(provider = "ollama_chat", %error, "in-band error in stream");
            return Err(LLMError::provider(
                "ollama_chat",
                format!("Ollama error: {error}"),
            ));
        }
        if parsed.done {
            return Ok(Some(Chunk::terminal()));
        }

        let content = parsed
            .message
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty());
        Ok(content.map(Chunk::text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_content_until_done() {
        let mut decoder = OllamaNdjsonDecoder;
        let lines = [
            r#"{"model":"llama3.2","message":{"role":"assistant","content":"The"},"done":false}"#,
            r#"{"model":"llama3.2","message":{"role":"assistant","content":""},"done":false}"#,
            r#"{"model":"llama3.2","message":{"role":"assistant","content":" sky"},"done":false}"#,
            r#"{"model":"llama3.2","message":{"role":"assistant","content":"ignored"},"done":true,"eval_count":3}"#,
        ];
        let chunks: Vec<Chunk> = lines
            .iter()
            .filter_map(|line| decoder.decode_line(line).expect("decode"))
            .collect();
        assert_eq!(
            chunks,
            vec![Chunk::text("The"), Chunk::text(" sky"), Chunk::terminal()]
        );
    }

    #[test]
    fn in_band_error_line_fails_the_stream() {
        let err = OllamaNdjsonDecoder
            .decode_line(r#"{"error":"an error was encountered while running the model"}"#)
            .expect_err("should fail");
        assert!(matches!(err, LLMError::Provider { provider: "ollama_chat", .. }));
    }

    #[test]
    fn non_json_line_is_a_provider_error() {
        assert!(OllamaNdjsonDecoder.decode_line("data: {}").is_err());
    }
}
