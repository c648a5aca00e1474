use serde_json::{Map, Value, json};

use crate::types::CompletionRequest;

/// Model families that reject `max_tokens` and expect `max_completion_tokens`.
///
/// Matching is purely textual: `o1`/`o3` prefixes, `gpt-4o`/`gpt-5` substrings.
pub(crate) fn uses_max_completion_tokens(model: &str) -> bool {
    model.starts_with("o1")
        || model.starts_with("o3")
        || model.contains("gpt-4o")
        || model.contains("gpt-5")
}

/// Builds the Chat Completions request body.
pub(crate) fn build_openai_body(request: &CompletionRequest, stream: bool) -> Value {
    let mut body = Map::new();
    body.insert("model".to_string(), Value::String(request.model.clone()));

    let mut messages = Vec::new();
    if let Some(system) = &request.system {
        messages.push(json!({ "role": "system", "content": system }));
    }
    messages.push(json!({ "role": "user", "content": request.prompt }));
    body.insert("messages".to_string(), Value::Array(messages));

    let mut params = request.params.clone();
    if let Some(max_tokens) = params.remove("max_tokens").filter(|v| !v.is_null()) {
        let key = if uses_max_completion_tokens(&request.model) {
            "max_completion_tokens"
        } else {
            "max_tokens"
        };
        body.insert(key.to_string(), max_tokens);
    }

    for (k, v) in params {
        body.insert(k, v);
    }
    body.insert("stream".to_string(), Value::Bool(stream));
    Value::Object(body)
}
