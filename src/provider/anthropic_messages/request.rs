use serde_json::{Map, Value, json};

use crate::types::CompletionRequest;

/// Anthropic requires `max_tokens`; used when the caller does not set it.
pub(crate) const DEFAULT_MAX_TOKENS: u64 = 1024;

/// Builds the Anthropic Messages request body.
///
/// The system prompt is a top-level field, never a message, and `stream` is only sent
/// for streaming calls.
pub(crate) fn build_anthropic_body(request: &CompletionRequest, stream: bool) -> Value {
    let mut params = request.params.clone();
    params.remove("stream");
    let max_tokens = params
        .remove("max_tokens")
        .filter(|v| !v.is_null())
        .unwrap_or_else(|| Value::from(DEFAULT_MAX_TOKENS));

    let mut body = Map::new();
    body.insert("model".to_string(), Value::String(request.model.clone()));
    body.insert(
        "messages".to_string(),
        json!([{ "role": "user", "content": request.prompt }]),
    );
    body.insert("max_tokens".to_string(), max_tokens);
    if let Some(system) = &request.system {
        body.insert("system".to_string(), Value::String(system.clone()));
    }

    // Passthrough params such as temperature or stop_sequences.
    for (k, v) in params {
        body.insert(k, v);
    }
    if stream {
        body.insert("stream".to_string(), Value::Bool(true));
    }
    Value::Object(body)
}
