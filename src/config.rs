//! Provider and profile registry consumed by [`crate::client::Client`].
//!
//! Providers are opaque key/value bags handed to an adapter at construction; profiles
//! bind a provider to a model plus default request params.
//!
//! ```toml
//! default_profile = "fast"
//!
//! [providers.openai]
//! api_key_env = "OPENAI_API_KEY"
//!
//! [providers.local]
//! adapter = "ollama"
//! endpoint = "http://gpu-box:11434"
//!
//! [profiles.fast]
//! provider = "openai"
//! model = "gpt-4o-mini"
//! max_tokens = 512
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LLMError;
use crate::types::Params;

/// Opaque per-provider settings such as `api_key`, `base_url` or `endpoint`.
///
/// Nothing is validated up front: a missing key only matters to the adapter that reads
/// it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderSettings(HashMap<String, Value>);

impl ProviderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a key, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a string setting; non-string values are treated as absent.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Resolves the API key from `api_key`, falling back to the environment variable
    /// named by `api_key_env`.
    pub fn api_key(&self) -> Option<String> {
        if let Some(key) = self.get_str("api_key") {
            return Some(key.to_string());
        }
        self.get_str("api_key_env")
            .and_then(|name| std::env::var(name).ok())
    }

    /// Reads `timeout_secs` as whole or fractional seconds.
    pub fn timeout(&self) -> Option<Duration> {
        self.get("timeout_secs")
            .and_then(Value::as_f64)
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64)
    }
}

/// Named binding of a provider, a model and default params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Key into [`Configuration::providers`].
    pub provider: String,
    pub model: String,
    /// Every other profile key, forwarded as request params.
    #[serde(flatten)]
    pub params: Params,
}

impl Profile {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            params: Params::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Registry of providers, profiles and the default profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub providers: HashMap<String, ProviderSettings>,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub default_profile: Option<String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, name: impl Into<String>, settings: ProviderSettings) -> Self {
        self.providers.insert(name.into(), settings);
        self
    }

    pub fn with_profile(mut self, name: impl Into<String>, profile: Profile) -> Self {
        self.profiles.insert(name.into(), profile);
        self
    }

    pub fn with_default_profile(mut self, name: impl Into<String>) -> Self {
        self.default_profile = Some(name.into());
        self
    }

    /// Parses configuration from a TOML document.
    ///
    /// # Examples
    ///
    /// ```
    /// use parley_llm::config::Configuration;
    ///
    /// let config = Configuration::from_toml_str(r#"
    /// default_profile = "local"
    ///
    /// [providers.ollama]
    /// endpoint = "http://localhost:11434"
    ///
    /// [profiles.local]
    /// provider = "ollama"
    /// model = "llama3.2"
    /// temperature = 0.1
    /// "#).unwrap();
    ///
    /// assert_eq!(config.default_profile.as_deref(), Some("local"));
    /// assert_eq!(config.profiles["local"].params["temperature"], 0.1);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::InvalidConfig`] when the document is not valid TOML or does not
    /// match the expected shape.
    pub fn from_toml_str(source: &str) -> Result<Self, LLMError> {
        toml::from_str(source).map_err(|err| LLMError::InvalidConfig {
            field: "config".to_string(),
            reason: err.to_string(),
        })
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::InvalidConfig`] when the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LLMError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|err| LLMError::InvalidConfig {
            field: "config_file".to_string(),
            reason: format!("failed to read '{}': {err}", path.display()),
        })?;
        Self::from_toml_str(&contents).map_err(|err| match err {
            LLMError::InvalidConfig { reason, .. } => LLMError::InvalidConfig {
                field: "config_file".to_string(),
                reason: format!("failed to parse '{}': {reason}", path.display()),
            },
            other => other,
        })
    }
}
