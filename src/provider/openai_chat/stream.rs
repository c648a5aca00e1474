use crate::error::LLMError;
use crate::http::HttpBodyStream;
use crate::provider::ChunkStream;
use crate::stream::{LineDecoder, LineStream};
use crate::types::Chunk;

use super::types::OpenAiStreamChunk;

const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "[DONE]";

pub(crate) fn create_stream(body: HttpBodyStream, provider: &'static str) -> ChunkStream {
    Box::pin(LineStream::new(body, OpenAiSseDecoder, provider))
}

/// Decodes the bare `data:` SSE framing of Chat Completions streams.
///
/// Lines without the `data: ` prefix (comments, `event:` fields) are ignored and the
/// `[DONE]` payload ends the stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAiSseDecoder;

impl LineDecoder for OpenAiSseDecoder {
    fn decode_line(&mut self, line: &str) -> Result<Option<Chunk>, LLMError> {
        let Some(data) = line.strip_prefix(DATA_PREFIX) else {
            return Ok(None);
        };
        if data == DONE_MARKER {
            return Ok(Some(Chunk::terminal()));
        }

        let chunk: OpenAiStreamChunk = serde_json::from_str(data).map_err(|err| {
            LLMError::provider("openai_chat", format!("failed to parse stream chunk: {err}"))
        })?;
        let content = chunk
            .choices
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
            .filter(|content| !content.is_empty());
        Ok(content.map(Chunk::text))
    }
}
