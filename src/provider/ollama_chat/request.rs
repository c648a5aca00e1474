use serde_json::{Map, Value, json};

use crate::types::CompletionRequest;

/// Builds the `/api/chat` request body; params are passed through untouched.
pub(crate) fn build_ollama_body(request: &CompletionRequest, stream: bool) -> Value {
    let mut body = Map::new();
    body.insert("model".to_string(), Value::String(request.model.clone()));

    let mut messages = Vec::new();
    if let Some(system) = &request.system {
        messages.push(json!({ "role": "system", "content": system }));
    }
    messages.push(json!({ "role": "user", "content": request.prompt }));
    body.insert("messages".to_string(), Value::Array(messages));

    for (k, v) in &request.params {
        body.insert(k.clone(), v.clone());
    }
    body.insert("stream".to_string(), Value::Bool(stream));
    Value::Object(body)
}
