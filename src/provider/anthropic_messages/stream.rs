use crate::error::LLMError;
use crate::http::HttpBodyStream;
use crate::provider::ChunkStream;
use crate::stream::{LineDecoder, LineStream};
use crate::types::Chunk;

use super::types::{AnthropicDeltaEvent, AnthropicErrorBody};

const EVENT_PREFIX: &str = "event: ";
const DATA_PREFIX: &str = "data: ";

pub(crate) fn create_stream(body: HttpBodyStream, provider: &'static str) -> ChunkStream {
    Box::pin(LineStream::new(body, AnthropicEventDecoder::default(), provider))
}

/// Decodes Anthropic's typed SSE stream.
///
/// `event:` lines name the record that the following `data:` line belongs to, so the
/// decoder remembers the last name seen and dispatches each payload on it.
#[derive(Debug, Default, Clone)]
pub struct AnthropicEventDecoder {
    current_event: Option<String>,
}

impl AnthropicEventDecoder {
    /// Name of the event the next `data:` line will be attributed to.
    pub fn current_event(&self) -> Option<&str> {
        self.current_event.as_deref()
    }

    fn decode_text_delta(data: &str) -> Result<Option<Chunk>, LLMError> {
        let event: AnthropicDeltaEvent = serde_json::from_str(data).map_err(|err| {
            LLMError::provider(
                "anthropic_messages",
                format!("failed to parse stream event: {err}"),
            )
        })?;
        let text = event
            .delta
            .filter(|delta| delta.kind.as_deref() == Some("text_delta"))
            .and_then(|delta| delta.text)
            .filter(|text| !text.is_empty());
        Ok(text.map(Chunk::text))
    }

    fn decode_error(data: &str) -> LLMError {
        let detail = serde_json::from_str::<AnthropicErrorBody>(data)
            .ok()
            .and_then(|body| body.error);
        let message = match detail {
            Some(detail) => format!(
                "stream error ({}): {}",
                detail.kind.as_deref().unwrap_or("unknown"),
                detail.message.as_deref().unwrap_or(data)
            ),
            None => format!("stream error: {data}"),
        };
        tracing::warn!(provider = "anthropic_messages", %message, "in-stream error event");
        LLMError::provider("anthropic_messages", message)
    }
}

impl LineDecoder for AnthropicEventDecoder {
    fn decode_line(&mut self, line: &str) -> Result<Option<Chunk>, LLMError> {
        if let Some(name) = line.strip_prefix(EVENT_PREFIX) {
            self.current_event = Some(name.to_string());
            return Ok(None);
        }
        let Some(data) = line.strip_prefix(DATA_PREFIX) else {
            return Ok(None);
        };

        match self.current_event.as_deref() {
            // The payload of message_stop carries nothing we need.
            Some("message_stop") => Ok(Some(Chunk::terminal())),
            Some("content_block_delta") => Self::decode_text_delta(data),
            Some("error") => Err(Self::decode_error(data)),
            _ => Ok(None),
        }
    }
}
