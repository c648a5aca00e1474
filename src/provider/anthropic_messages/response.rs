use crate::types::{Response, Usage};

use super::types::{AnthropicMessageResponse, AnthropicUsage};

pub(crate) fn map_response(response: AnthropicMessageResponse, model: &str) -> Response {
    let content = response
        .content
        .unwrap_or_default()
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .unwrap_or_default();

    Response {
        content,
        model: model.to_string(),
        usage: response.usage.map(convert_usage).unwrap_or_default(),
    }
}

pub(crate) fn convert_usage(usage: AnthropicUsage) -> Usage {
    Usage {
        prompt_tokens: usage.input_tokens.unwrap_or(0),
        completion_tokens: usage.output_tokens.unwrap_or(0),
    }
}
