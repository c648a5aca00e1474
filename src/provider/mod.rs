use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_core::Stream;
use futures_util::StreamExt;

use crate::error::LLMError;
use crate::types::{Chunk, CompletionRequest, Response};

pub mod anthropic_messages;
pub mod ollama_chat;
pub mod openai_chat;

/// Stream of incremental chunks; ends right after the final chunk or the first error.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Chunk, LLMError>> + Send>>;

/// Whole-request deadline for blocking completions unless a provider overrides it.
///
/// It covers connecting, sending and reading the buffered body, so for a completion it
/// bounds the same wait a read timeout would. Streams get no deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Capability surface shared by every vendor adapter.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Issues one request and waits for the aggregated response.
    async fn complete(&self, request: CompletionRequest) -> Result<Response, LLMError>;

    /// Opens a streaming request and returns its chunks lazily.
    ///
    /// Non-success statuses fail here, before any chunk is produced.
    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, LLMError>;

    /// Drives [`LLMProvider::stream`] and hands every chunk to `sink` in arrival order.
    ///
    /// Returns once the final chunk has been delivered. On failure the error is returned
    /// and `sink` is not invoked again.
    async fn stream_to(
        &self,
        request: CompletionRequest,
        sink: &mut (dyn FnMut(Chunk) + Send),
    ) -> Result<(), LLMError> {
        let mut stream = self.stream(request).await?;
        while let Some(item) = stream.next().await {
            let chunk = item?;
            let is_final = chunk.is_final;
            sink(chunk);
            if is_final {
                return Ok(());
            }
        }
        Err(LLMError::provider(
            self.name(),
            "stream ended without a terminal chunk",
        ))
    }

    /// Adapter identifier used in errors and logs.
    fn name(&self) -> &'static str;
}

/// Thread-safe provider handle.
pub type DynProvider = Arc<dyn LLMProvider>;

/// Joins a configured or default base URL with an API path.
///
/// An empty configured value counts as absent, and trailing slashes on the base are
/// dropped.
pub(crate) fn resolve_endpoint(configured: Option<&str>, default: &str, path: &str) -> String {
    let base = configured.filter(|base| !base.is_empty()).unwrap_or(default);
    format!("{}/{path}", base.trim_end_matches('/'))
}
