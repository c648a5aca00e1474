use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ProviderSettings;
use crate::error::LLMError;
use crate::http::{DynHttpTransport, post_json_stream_with_headers, post_json_with_headers};
use crate::provider::{ChunkStream, DEFAULT_TIMEOUT, LLMProvider, resolve_endpoint};
use crate::stream::collect_stream_text;
use crate::types::{CompletionRequest, Response};

use super::error::parse_openai_error;
use super::request::build_openai_body;
use super::response::map_response;
use super::stream::create_stream;
use super::types::OpenAiChatResponse;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI Chat Completions provider.
///
/// Also works against OpenAI-compatible gateways through [`Self::with_base_url`].
pub struct OpenAiChatProvider {
    pub(crate) transport: DynHttpTransport,
    pub(crate) base_url: Option<String>,
    pub(crate) api_key: Option<String>,
    pub(crate) timeout: Duration,
}

impl OpenAiChatProvider {
    /// Creates a provider pointing at the public OpenAI API.
    pub fn new(transport: DynHttpTransport) -> Self {
        Self {
            transport,
            base_url: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds a provider from `api_key`/`api_key_env`, `base_url` and `timeout_secs`.
    pub fn from_settings(transport: DynHttpTransport, settings: &ProviderSettings) -> Self {
        Self {
            transport,
            base_url: settings.get_str("base_url").map(str::to_string),
            api_key: settings.api_key(),
            timeout: settings.timeout().unwrap_or(DEFAULT_TIMEOUT),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Overrides the base URL, e.g. `https://proxy.example.com/v1`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Timeout applied to blocking completions.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn endpoint(&self) -> String {
        resolve_endpoint(self.base_url.as_deref(), DEFAULT_BASE_URL, "chat/completions")
    }

    fn build_headers(&self) -> HashMap<String, String> {
        // Sent even without a key; the API answers 401 in that case.
        let api_key = self.api_key.as_deref().unwrap_or_default();
        HashMap::from([
            ("Authorization".to_string(), format!("Bearer {api_key}")),
            ("Content-Type".to_string(), "application/json".to_string()),
        ])
    }
}

#[async_trait]
impl LLMProvider for OpenAiChatProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Response, LLMError> {
        let endpoint = self.endpoint();
        tracing::debug!(
            provider = self.name(),
            model = %request.model,
            %endpoint,
            "sending completion request"
        );

        let body = build_openai_body(&request, false);
        let response = post_json_with_headers(
            self.transport.as_ref(),
            endpoint,
            self.build_headers(),
            &body,
            Some(self.timeout),
        )
        .await?;

        if !response.is_success() {
            let status = response.status;
            return Err(parse_openai_error(status, &response.into_lossy_string()));
        }
        let text = response.into_string()?;

        let parsed: OpenAiChatResponse = serde_json::from_str(&text).map_err(|err| {
            LLMError::provider(self.name(), format!("failed to parse OpenAI response: {err}"))
        })?;
        Ok(map_response(parsed, &request.model))
    }

    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, LLMError> {
        let endpoint = self.endpoint();
        tracing::debug!(
            provider = self.name(),
            model = %request.model,
            %endpoint,
            "opening completion stream"
        );

        let body = build_openai_body(&request, true);
        let response = post_json_stream_with_headers(
            self.transport.as_ref(),
            endpoint,
            self.build_headers(),
            &body,
        )
        .await?;

        if !response.is_success() {
            let text = collect_stream_text(response.body).await?;
            return Err(parse_openai_error(response.status, &text));
        }
        Ok(create_stream(response.body, self.name()))
    }

    fn name(&self) -> &'static str {
        "openai_chat"
    }
}
