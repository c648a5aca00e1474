//! Line framing shared by the streaming decoders.
//!
//! Vendors frame their streams differently (typed SSE, bare SSE, NDJSON) but every
//! format is line oriented. [`LineStream`] splits raw body reads into physical lines and
//! hands each one to a vendor [`LineDecoder`], so decoding never depends on how the
//! transport happened to chunk the bytes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_util::StreamExt;

use crate::error::LLMError;
use crate::http::HttpBodyStream;
use crate::types::Chunk;

/// Turns one physical line of a vendor stream into at most one [`Chunk`].
///
/// Lines arrive trimmed and never empty. Returning a chunk with `is_final` set ends
/// the stream.
pub trait LineDecoder: Send + Unpin {
    fn decode_line(&mut self, line: &str) -> Result<Option<Chunk>, LLMError>;
}

/// [`Stream`] of chunks decoded line by line from an HTTP body.
///
/// The body is polled only when no complete line is buffered, so memory stays bounded
/// by one line plus one transport read. The stream ends right after the final chunk or
/// right after the first error.
pub struct LineStream<D> {
    body: HttpBodyStream,
    buffer: Vec<u8>,
    decoder: D,
    provider: &'static str,
    body_closed: bool,
    finished: bool,
}

impl<D: LineDecoder> LineStream<D> {
    pub fn new(body: HttpBodyStream, decoder: D, provider: &'static str) -> Self {
        Self {
            body,
            buffer: Vec::new(),
            decoder,
            provider,
            body_closed: false,
            finished: false,
        }
    }

    fn drain_line(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
        buffer.iter().position(|b| *b == b'\n').map(|pos| {
            let mut line: Vec<u8> = buffer.drain(..=pos).collect();
            line.pop();
            line
        })
    }

    fn decode(&mut self, line: Vec<u8>) -> Result<Option<Chunk>, LLMError> {
        let line = String::from_utf8(line).map_err(|err| {
            LLMError::provider(self.provider, format!("invalid UTF-8 in stream line: {err}"))
        })?;
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        self.decoder.decode_line(line)
    }
}

impl<D: LineDecoder> Stream for LineStream<D> {
    type Item = Result<Chunk, LLMError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.finished {
            return Poll::Ready(None);
        }

        loop {
            while let Some(line) = Self::drain_line(&mut this.buffer) {
                match this.decode(line) {
                    Ok(Some(chunk)) => {
                        if chunk.is_final {
                            this.finished = true;
                            tracing::debug!(
                                provider = this.provider,
                                "stream reached terminal chunk"
                            );
                        }
                        return Poll::Ready(Some(Ok(chunk)));
                    }
                    Ok(None) => continue,
                    Err(err) => {
                        this.finished = true;
                        return Poll::Ready(Some(Err(err)));
                    }
                }
            }

            if this.body_closed {
                // A last line without its newline still counts.
                if !this.buffer.is_empty() {
                    this.buffer.push(b'\n');
                    continue;
                }
                this.finished = true;
                return Poll::Ready(Some(Err(LLMError::provider(
                    this.provider,
                    "stream closed before the terminal marker",
                ))));
            }

            match this.body.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => this.buffer.extend_from_slice(&bytes),
                Poll::Ready(Some(Err(err))) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => this.body_closed = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Reads a whole body, used to recover the error payload of a failed streaming call.
///
/// Invalid UTF-8 is replaced so the status mapping still sees the raw text.
pub(crate) async fn collect_stream_text(mut body: HttpBodyStream) -> Result<String, LLMError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        bytes.extend_from_slice(&chunk?);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
