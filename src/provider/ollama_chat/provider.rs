use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ProviderSettings;
use crate::error::LLMError;
use crate::http::{DynHttpTransport, post_json_stream_with_headers, post_json_with_headers};
use crate::provider::{ChunkStream, DEFAULT_TIMEOUT, LLMProvider, resolve_endpoint};
use crate::stream::collect_stream_text;
use crate::types::{CompletionRequest, Response};

use super::error::{connection_hint, parse_ollama_error};
use super::request::build_ollama_body;
use super::response::map_response;
use super::stream::create_stream;
use super::types::OllamaChatResponse;

const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Ollama chat provider.
///
/// Authentication is optional: a bearer token is only sent when a non-empty key is
/// configured, which covers Ollama instances behind an authenticating proxy.
pub struct OllamaChatProvider {
    pub(crate) transport: DynHttpTransport,
    pub(crate) endpoint: Option<String>,
    pub(crate) api_key: Option<String>,
    pub(crate) timeout: Duration,
}

impl OllamaChatProvider {
    /// Creates a provider pointing at `http://localhost:11434`.
    pub fn new(transport: DynHttpTransport) -> Self {
        Self {
            transport,
            endpoint: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds a provider from `endpoint`, `api_key`/`api_key_env` and `timeout_secs`.
    pub fn from_settings(transport: DynHttpTransport, settings: &ProviderSettings) -> Self {
        Self {
            transport,
            endpoint: settings.get_str("endpoint").map(str::to_string),
            api_key: settings.api_key(),
            timeout: settings.timeout().unwrap_or(DEFAULT_TIMEOUT),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Server root, e.g. `http://gpu-box:11434`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn chat_url(&self) -> String {
        resolve_endpoint(self.endpoint.as_deref(), DEFAULT_ENDPOINT, "api/chat")
    }

    fn build_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        if let Some(api_key) = self.api_key.as_deref().filter(|key| !key.is_empty()) {
            headers.insert("Authorization".to_string(), format!("Bearer {api_key}"));
        }
        headers
    }

    /// Turns an unreachable server into [`LLMError::Connection`].
    fn map_transport_error(&self, err: LLMError, url: &str) -> LLMError {
        if err.is_connect() {
            tracing::warn!(
                provider = self.name(),
                %url,
                "ollama endpoint refused the connection"
            );
            LLMError::Connection {
                message: connection_hint(url),
            }
        } else {
            err
        }
    }
}

#[async_trait]
impl LLMProvider for OllamaChatProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Response, LLMError> {
        let url = self.chat_url();
        tracing::debug!(
            provider = self.name(),
            model = %request.model,
            %url,
            "sending completion request"
        );

        let body = build_ollama_body(&request, false);
        let response = post_json_with_headers(
            self.transport.as_ref(),
            url.clone(),
            self.build_headers(),
            &body,
            Some(self.timeout),
        )
        .await
        .map_err(|err| self.map_transport_error(err, &url))?;

        if !response.is_success() {
            let status = response.status;
            return Err(parse_ollama_error(status, &response.into_lossy_string()));
        }
        let text = response.into_string()?;

        let parsed: OllamaChatResponse = serde_json::from_str(&text).map_err(|err| {
            LLMError::provider(self.name(), format!("failed to parse Ollama response: {err}"))
        })?;
        map_response(parsed, &request.model)
    }

    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, LLMError> {
        let url = self.chat_url();
        tracing::debug!(
            provider = self.name(),
            model = %request.model,
            %url,
            "opening completion stream"
        );

        let body = build_ollama_body(&request, true);
        let response = post_json_stream_with_headers(
            self.transport.as_ref(),
            url.clone(),
            self.build_headers(),
            &body,
        )
        .await
        .map_err(|err| self.map_transport_error(err, &url))?;

        if !response.is_success() {
            let text = collect_stream_text(response.body).await?;
            return Err(parse_ollama_error(response.status, &text));
        }
        Ok(create_stream(response.body, self.name()))
    }

    fn name(&self) -> &'static str {
        "ollama_chat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportErrorKind;
    use crate::http::reqwest::default_dyn_transport;

    fn provider() -> OllamaChatProvider {
        OllamaChatProvider::new(default_dyn_transport().expect("transport"))
    }

    #[test]
    fn chat_url_defaults_and_strips_trailing_slash() {
        assert_eq!(provider().chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(
            provider().with_endpoint("http://gpu-box:11434/").chat_url(),
            "http://gpu-box:11434/api/chat"
        );
        assert_eq!(
            provider().with_endpoint("").chat_url(),
            "http://localhost:11434/api/chat"
        );
    }

    #[test]
    fn authorization_only_sent_for_non_empty_keys() {
        assert!(!provider().build_headers().contains_key("Authorization"));
        assert!(!provider().with_api_key("").build_headers().contains_key("Authorization"));
        assert_eq!(
            provider()
                .with_api_key("k")
                .build_headers()
                .get("Authorization")
                .map(String::as_str),
            Some("Bearer k")
        );
    }

    #[test]
    fn only_connect_failures_become_connection_errors() {
        let provider = provider();
        let url = provider.chat_url();
        let refused = LLMError::Transport {
            kind: TransportErrorKind::Connect,
            message: "connection refused".into(),
        };
        match provider.map_transport_error(refused, &url) {
            LLMError::Connection { message } => {
                assert_eq!(
                    message,
                    "Could not connect to Ollama at http://localhost:11434/api/chat. Is Ollama running?"
                );
            }
            other => panic!("expected Connection, got {other:?}"),
        }

        let timeout = LLMError::Transport {
            kind: TransportErrorKind::Timeout,
            message: "timed out".into(),
        };
        assert!(matches!(
            provider.map_transport_error(timeout, &url),
            LLMError::Transport { kind: TransportErrorKind::Timeout, .. }
        ));
    }
}
