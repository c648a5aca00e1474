use std::sync::Arc;

use serde_json::Value;

use crate::config::{Configuration, Profile, ProviderSettings};
use crate::error::LLMError;
use crate::http::DynHttpTransport;
use crate::http::reqwest::default_dyn_transport;
use crate::provider::anthropic_messages::AnthropicMessagesProvider;
use crate::provider::ollama_chat::OllamaChatProvider;
use crate::provider::openai_chat::OpenAiChatProvider;
use crate::provider::{ChunkStream, DynProvider};
use crate::types::{Chunk, CompletionRequest, Params, Response};

/// Adapter families a provider entry can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    /// Maps `openai`, `anthropic` or `ollama` to a kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    fn build(self, transport: DynHttpTransport, settings: &ProviderSettings) -> DynProvider {
        match self {
            Self::OpenAi => Arc::new(OpenAiChatProvider::from_settings(transport, settings)),
            Self::Anthropic => {
                Arc::new(AnthropicMessagesProvider::from_settings(transport, settings))
            }
            Self::Ollama => Arc::new(OllamaChatProvider::from_settings(transport, settings)),
        }
    }
}

/// Per-call input: the prompt plus params that override the profile defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prompt {
    pub prompt: String,
    pub system: Option<String>,
    pub params: Params,
}

impl Prompt {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Profile-driven entry point.
///
/// A call names a profile (or falls back to the default one); the profile picks the
/// provider entry and model, and the provider entry picks the adapter. Adapters are
/// built per call from immutable settings, so a `Client` can be shared freely.
pub struct Client {
    configuration: Configuration,
    transport: DynHttpTransport,
}

impl Client {
    pub fn new(configuration: Configuration, transport: DynHttpTransport) -> Self {
        Self {
            configuration,
            transport,
        }
    }

    /// Builds a client backed by [`crate::http::reqwest::ReqwestTransport`].
    pub fn with_default_transport(configuration: Configuration) -> Result<Self, LLMError> {
        Ok(Self::new(configuration, default_dyn_transport()?))
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Returns the configured profile names, sorted.
    pub fn profiles(&self) -> Vec<String> {
        let mut names: Vec<String> = self.configuration.profiles.keys().cloned().collect();
        names.sort();
        names
    }

    /// Sends a blocking completion through the selected profile.
    pub async fn complete(
        &self,
        profile: Option<&str>,
        prompt: Prompt,
    ) -> Result<Response, LLMError> {
        let (provider, request) = self.prepare(profile, prompt)?;
        provider.complete(request).await
    }

    /// Opens a completion stream through the selected profile.
    pub async fn stream(
        &self,
        profile: Option<&str>,
        prompt: Prompt,
    ) -> Result<ChunkStream, LLMError> {
        let (provider, request) = self.prepare(profile, prompt)?;
        provider.stream(request).await
    }

    /// Streams through the selected profile, handing every chunk to `sink`.
    pub async fn stream_to(
        &self,
        profile: Option<&str>,
        prompt: Prompt,
        sink: &mut (dyn FnMut(Chunk) + Send),
    ) -> Result<(), LLMError> {
        let (provider, request) = self.prepare(profile, prompt)?;
        provider.stream_to(request, sink).await
    }

    /// Looks up a profile by name, or the default profile when `name` is `None`.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<(&str, &Profile), LLMError> {
        let name = match name {
            Some(name) => name,
            None => self
                .configuration
                .default_profile
                .as_deref()
                .ok_or(LLMError::NoDefaultProfile)?,
        };
        self.configuration
            .profiles
            .get_key_value(name)
            .map(|(name, profile)| (name.as_str(), profile))
            .ok_or_else(|| LLMError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Builds the adapter serving `profile`.
    pub fn build_provider(
        &self,
        profile_name: &str,
        profile: &Profile,
    ) -> Result<DynProvider, LLMError> {
        let settings = self
            .configuration
            .providers
            .get(&profile.provider)
            .ok_or_else(|| LLMError::ProviderNotConfigured {
                message: format!(
                    "Provider '{}' referenced by profile '{}' is not configured",
                    profile.provider, profile_name
                ),
            })?;

        let adapter = settings.get_str("adapter").unwrap_or(profile.provider.as_str());
        let kind =
            ProviderKind::from_name(adapter).ok_or_else(|| LLMError::ProviderNotConfigured {
                message: format!("No provider adapter registered for '{adapter}'"),
            })?;
        Ok(kind.build(Arc::clone(&self.transport), settings))
    }

    fn prepare(
        &self,
        profile: Option<&str>,
        prompt: Prompt,
    ) -> Result<(DynProvider, CompletionRequest), LLMError> {
        let (profile_name, profile) = self.resolve_profile(profile)?;
        let provider = self.build_provider(profile_name, profile)?;

        let mut params = profile.params.clone();
        params.extend(prompt.params);

        tracing::debug!(
            profile = profile_name,
            provider = provider.name(),
            model = %profile.model,
            "dispatching completion"
        );

        let request = CompletionRequest {
            model: profile.model.clone(),
            prompt: prompt.prompt,
            system: prompt.system,
            params,
        };
        Ok((provider, request))
    }
}
