//! Vendor-neutral request and result types shared by every adapter.
//!
//! Adapters translate their wire formats into these shapes so callers never observe
//! vendor-specific payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open mapping of vendor-specific request fields such as `temperature` or `max_tokens`.
pub type Params = Map<String, Value>;

/// Token counters reported by the vendor, zero when the vendor omits them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Aggregated result of a blocking completion.
///
/// # Examples
///
/// ```
/// use parley_llm::types::{Response, Usage};
///
/// let response = Response {
///     content: "Hello!".into(),
///     model: "gpt-4o-mini".into(),
///     usage: Usage::default(),
/// };
/// assert_eq!(response.usage.prompt_tokens, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Decoded assistant text, possibly empty.
    pub content: String,
    /// Echo of the model identifier that was requested.
    pub model: String,
    /// Normalized token usage.
    pub usage: Usage,
}

/// Incremental fragment of a streamed completion.
///
/// A stream is a finite sequence of chunks terminated by exactly one chunk for which
/// [`Chunk::is_final`] is `true` and whose content is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub is_final: bool,
}

impl Chunk {
    /// Builds a non-final chunk carrying `content`.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_final: false,
        }
    }

    /// Builds the terminal chunk of a stream.
    pub fn terminal() -> Self {
        Self {
            content: String::new(),
            is_final: true,
        }
    }
}

/// Vendor-neutral description of a single completion call.
///
/// # Examples
///
/// ```
/// use parley_llm::types::CompletionRequest;
///
/// let request = CompletionRequest::new("claude-3-5-haiku-latest", "Say hi")
///     .with_system("You are terse.")
///     .with_param("max_tokens", 64);
/// assert_eq!(request.system.as_deref(), Some("You are terse."));
/// assert_eq!(request.params["max_tokens"], 64);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier passed verbatim to the vendor.
    pub model: String,
    /// User prompt text.
    pub prompt: String,
    /// Optional system prompt.
    #[serde(default)]
    pub system: Option<String>,
    /// Extra body fields merged at call time.
    #[serde(default)]
    pub params: Params,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            params: Params::new(),
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

    pub fn with_params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }
}
