//! Anthropic Messages adapter.

mod error;
mod provider;
mod request;
mod response;
mod stream;
mod types;

pub use provider::AnthropicMessagesProvider;
pub use stream::AnthropicEventDecoder;
