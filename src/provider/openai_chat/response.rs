use crate::types::{Response, Usage};

use super::types::{OpenAiChatResponse, OpenAiUsage};

pub(crate) fn map_response(response: OpenAiChatResponse, model: &str) -> Response {
    let content = response
        .choices
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_default();

    Response {
        content,
        model: model.to_string(),
        usage: response.usage.map(convert_usage).unwrap_or_default(),
    }
}

pub(crate) fn convert_usage(usage: OpenAiUsage) -> Usage {
    Usage {
        prompt_tokens: usage.prompt_tokens.unwrap_or(0),
        completion_tokens: usage.completion_tokens.unwrap_or(0),
    }
}
