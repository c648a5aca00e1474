use serde::Deserialize;

/// Non-streaming response payload returned by Anthropic Messages.
#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicMessageResponse {
    /// Ordered list of content blocks; `null` is treated like an empty list.
    #[serde(default)]
    pub(crate) content: Option<Vec<AnthropicContentBlock>>,
    #[serde(default)]
    pub(crate) usage: Option<AnthropicUsage>,
}

/// Content block; only `text` blocks carry text, tool and thinking blocks are skipped.
#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicContentBlock {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) text: Option<String>,
}

/// Usage counters returned by Anthropic.
#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicUsage {
    #[serde(default)]
    pub(crate) input_tokens: Option<u64>,
    #[serde(default)]
    pub(crate) output_tokens: Option<u64>,
}

/// Payload of a `content_block_delta` event.
#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicDeltaEvent {
    #[serde(default)]
    pub(crate) delta: Option<AnthropicDelta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicDelta {
    #[serde(default, rename = "type")]
    pub(crate) kind: Option<String>,
    #[serde(default)]
    pub(crate) text: Option<String>,
}

/// Error envelope shared by failed responses and in-stream `error` events.
#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicErrorBody {
    #[serde(default)]
    pub(crate) error: Option<AnthropicErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicErrorDetail {
    #[serde(default, rename = "type")]
    pub(crate) kind: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}
