//! OpenAI Chat Completions adapter.

mod error;
mod provider;
mod request;
mod response;
mod stream;
mod types;

pub use provider::OpenAiChatProvider;
pub use stream::OpenAiSseDecoder;
