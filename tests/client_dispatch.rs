mod common;

use common::{MockTransport, dyn_transport};
use futures_util::StreamExt;
use parley_llm::{Chunk, Client, Configuration, LLMError, Prompt};
use serde_json::json;

const CONFIG: &str = r#"
default_profile = "fast"

[providers.openai]
api_key = "sk-config"
base_url = "https://gateway.local/v1"

[providers.claude]
adapter = "anthropic"
api_key = "sk-ant-config"

[providers.local]
adapter = "ollama"
endpoint = "http://gpu-box:11434"

[profiles.fast]
provider = "openai"
model = "gpt-4-turbo"
max_tokens = 512
temperature = 0.2

[profiles.careful]
provider = "claude"
model = "claude-sonnet-4-5"

[profiles.offline]
provider = "local"
model = "llama3.2"
"#;

const OPENAI_REPLY: &str =
    r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}],"usage":{"prompt_tokens":3,"completion_tokens":1}}"#;

fn configuration() -> Configuration {
    Configuration::from_toml_str(CONFIG).expect("valid config")
}

#[tokio::test]
async fn default_profile_routes_to_openai_with_merged_params() {
    let transport = MockTransport::new(200, OPENAI_REPLY);
    let client = Client::new(configuration(), dyn_transport(&transport));

    let response = client
        .complete(None, Prompt::new("Hi").with_param("temperature", 0.9))
        .await
        .expect("completion");
    assert_eq!(response.content, "ok");
    assert_eq!(response.model, "gpt-4-turbo");

    let sent = transport.last_request();
    assert_eq!(sent.url, "https://gateway.local/v1/chat/completions");
    assert_eq!(sent.header("Authorization"), Some("Bearer sk-config"));

    let body = transport.last_body();
    assert_eq!(body["max_tokens"], 512);
    assert_eq!(body["temperature"], 0.9);
}

#[tokio::test]
async fn adapter_setting_selects_anthropic_and_ollama() {
    let transport = MockTransport::new(
        200,
        r#"{"content":[{"type":"text","text":"fine"}],"usage":{"input_tokens":4,"output_tokens":2}}"#,
    );
    let client = Client::new(configuration(), dyn_transport(&transport));
    let response = client
        .complete(Some("careful"), Prompt::new("Hi").with_system("Be careful."))
        .await
        .expect("completion");
    assert_eq!(response.content, "fine");

    let sent = transport.last_request();
    assert_eq!(sent.url, "https://api.anthropic.com/v1/messages");
    assert_eq!(sent.header("x-api-key"), Some("sk-ant-config"));
    assert_eq!(transport.last_body()["system"], "Be careful.");

    let transport = MockTransport::split(
        200,
        "{\"message\":{\"content\":\"local\"},\"done\":false}\n{\"done\":true}\n",
        6,
    );
    let client = Client::new(configuration(), dyn_transport(&transport));
    let chunks: Vec<Chunk> = client
        .stream(Some("offline"), Prompt::new("Hi"))
        .await
        .expect("stream opened")
        .map(|item| item.expect("chunk"))
        .collect()
        .await;
    assert_eq!(chunks, vec![Chunk::text("local"), Chunk::terminal()]);
    assert_eq!(transport.last_request().url, "http://gpu-box:11434/api/chat");
}

#[tokio::test]
async fn stream_to_goes_through_the_selected_profile() {
    let transport = MockTransport::split(
        200,
        "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\ndata: [DONE]\n\n",
        4,
    );
    let client = Client::new(configuration(), dyn_transport(&transport));
    let mut seen: Vec<Chunk> = Vec::new();
    client
        .stream_to(Some("fast"), Prompt::new("Hi"), &mut |chunk| seen.push(chunk))
        .await
        .expect("stream");
    assert_eq!(seen, vec![Chunk::text("a"), Chunk::terminal()]);
    assert_eq!(transport.last_body()["stream"], true);
}

#[tokio::test]
async fn resolution_errors_are_raised_before_any_request() {
    let transport = MockTransport::new(200, OPENAI_REPLY);

    let mut no_default = configuration();
    no_default.default_profile = None;
    let client = Client::new(no_default, dyn_transport(&transport));
    assert!(matches!(
        client.complete(None, Prompt::new("Hi")).await,
        Err(LLMError::NoDefaultProfile)
    ));
    assert!(matches!(
        client.complete(Some("missing"), Prompt::new("Hi")).await,
        Err(LLMError::ProfileNotFound { name }) if name == "missing"
    ));

    let dangling = configuration().with_default_profile("ghost");
    let client = Client::new(dangling, dyn_transport(&transport));
    assert!(matches!(
        client.complete(None, Prompt::new("Hi")).await,
        Err(LLMError::ProfileNotFound { name }) if name == "ghost"
    ));

    assert!(transport.requests().is_empty());
}

#[test]
fn malformed_toml_is_an_invalid_config_error() {
    let err = Configuration::from_toml_str("default_profile = [").expect_err("malformed");
    assert!(matches!(err, LLMError::InvalidConfig { field, .. } if field == "config"));

    let err =
        Configuration::from_toml_str("[profiles.fast]\nmodel = \"m\"").expect_err("no provider");
    assert!(matches!(err, LLMError::InvalidConfig { .. }));
}

#[test]
fn profile_extra_keys_become_params() {
    let configuration = configuration();
    let fast = &configuration.profiles["fast"];
    assert_eq!(fast.params.get("max_tokens"), Some(&json!(512)));
    assert_eq!(fast.params.get("temperature"), Some(&json!(0.2)));
    assert!(fast.params.get("provider").is_none());
}
