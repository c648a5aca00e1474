use serde::Deserialize;

/// Shape shared by the blocking body and every NDJSON stream line.
#[derive(Debug, Deserialize)]
pub(crate) struct OllamaChatResponse {
    #[serde(default)]
    pub(crate) message: Option<OllamaMessage>,
    #[serde(default)]
    pub(crate) done: bool,
    /// Ollama reports some failures in-band with a success status.
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub(crate) eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OllamaMessage {
    #[serde(default)]
    pub(crate) content: Option<String>,
}

impl OllamaChatResponse {
    /// Returns the in-band error message when it is present and non-empty.
    pub(crate) fn in_band_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }
}
