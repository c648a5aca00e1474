use std::env;

use dotenvy::dotenv;
use futures_util::StreamExt;
use parley_llm::http::reqwest::default_dyn_transport;
use parley_llm::provider::anthropic_messages::AnthropicMessagesProvider;
use parley_llm::provider::ollama_chat::OllamaChatProvider;
use parley_llm::provider::openai_chat::OpenAiChatProvider;
use parley_llm::{CompletionRequest, LLMProvider};

fn load_env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn request(model: &str) -> CompletionRequest {
    CompletionRequest::new(model, "Introduce the Rust language in one sentence.")
        .with_system("You are a helpful assistant.")
        .with_param("max_tokens", 128)
}

async fn assert_round_trip(provider: &dyn LLMProvider, model: &str) {
    let response = provider.complete(request(model)).await.expect("completion");
    assert!(!response.content.trim().is_empty(), "completion text should not be empty");
    assert_eq!(response.model, model);

    let mut stream = provider.stream(request(model)).await.expect("stream opened");
    let mut text = String::new();
    let mut finals = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.expect("chunk");
        if chunk.is_final {
            finals += 1;
        }
        text.push_str(&chunk.content);
    }
    assert_eq!(finals, 1);
    assert!(!text.trim().is_empty(), "streamed text should not be empty");
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY"]
async fn openai_chat_live() {
    dotenv().ok();
    let Some(api_key) = load_env_var("OPENAI_API_KEY") else {
        return;
    };
    let model = load_env_var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
    let mut provider = OpenAiChatProvider::new(default_dyn_transport().expect("transport"))
        .with_api_key(api_key);
    if let Some(base_url) = load_env_var("OPENAI_BASE_URL") {
        provider = provider.with_base_url(base_url);
    }
    assert_round_trip(&provider, &model).await;
}

#[tokio::test]
#[ignore = "requires ANTHROPIC_API_KEY"]
async fn anthropic_messages_live() {
    dotenv().ok();
    let Some(api_key) = load_env_var("ANTHROPIC_API_KEY") else {
        return;
    };
    let model = load_env_var("ANTHROPIC_MODEL").unwrap_or_else(|| "claude-haiku-4-5".to_string());
    let provider = AnthropicMessagesProvider::new(default_dyn_transport().expect("transport"))
        .with_api_key(api_key);
    assert_round_trip(&provider, &model).await;
}

#[tokio::test]
#[ignore = "requires a running Ollama server"]
async fn ollama_chat_live() {
    dotenv().ok();
    let endpoint = load_env_var("OLLAMA_ENDPOINT")
        .unwrap_or_else(|| "http://localhost:11434".to_string());
    let model = load_env_var("OLLAMA_MODEL").unwrap_or_else(|| "llama3.2".to_string());
    let provider = OllamaChatProvider::new(default_dyn_transport().expect("transport"))
        .with_endpoint(endpoint);
    assert_round_trip(&provider, &model).await;
}
