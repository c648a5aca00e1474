use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ProviderSettings;
use crate::error::LLMError;
use crate::http::{DynHttpTransport, post_json_stream_with_headers, post_json_with_headers};
use crate::provider::{ChunkStream, DEFAULT_TIMEOUT, LLMProvider, resolve_endpoint};
use crate::stream::collect_stream_text;
use crate::types::{CompletionRequest, Response};

use super::error::parse_anthropic_error;
use super::request::build_anthropic_body;
use super::response::map_response;
use super::stream::create_stream;
use super::types::AnthropicMessageResponse;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages provider.
pub struct AnthropicMessagesProvider {
    pub(crate) transport: DynHttpTransport,
    pub(crate) base_url: Option<String>,
    pub(crate) api_key: Option<String>,
    pub(crate) timeout: Duration,
}

impl AnthropicMessagesProvider {
    /// Creates a provider pointing at the public Anthropic API.
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

    /// Custom base URL including the version segment, e.g. `https://proxy.example.com/v1`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn endpoint(&self) -> String {
        resolve_endpoint(self.base_url.as_deref(), DEFAULT_BASE_URL, "messages")
    }

    fn build_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key".to_string(), api_key.clone());
        }
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert(
            "anthropic-version".to_string(),
            ANTHROPIC_VERSION.to_string(),
        );
        headers
    }
}

#[async_trait]
impl LLMProvider for AnthropicMessagesProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Response, LLMError> {
        let endpoint = self.endpoint();
        tracing::debug!(
            provider = self.name(),
            model = %request.model,
            %endpoint,
            "sending completion request"
        );

        let body = build_anthropic_body(&request, false);
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
            return Err(parse_anthropic_error(status, &response.into_lossy_string()));
        }
        let text = response.into_string()?;

        let parsed: AnthropicMessageResponse = serde_json::from_str(&text).map_err(|err| {
            LLMError::provider(
                self.name(),
                format!("failed to parse Anthropic response: {err}"),
            )
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

        let body = build_anthropic_body(&request, true);
        let response = post_json_stream_with_headers(
            self.transport.as_ref(),
            endpoint,
            self.build_headers(),
            &body,
        )
        .await?;

        if !response.is_success() {
            let text = collect_stream_text(response.body).await?;
            return Err(parse_anthropic_error(response.status, &text));
        }
        Ok(create_stream(response.body, self.name()))
    }

    fn name(&self) -> &'static str {
        "anthropic_messages"
    }
}
