//! One calling convention over several hosted and local LLM completion APIs.
//!
//! Each adapter implements [`LLMProvider`]: a blocking [`LLMProvider::complete`] that
//! returns a normalized [`Response`], and [`LLMProvider::stream`] /
//! [`LLMProvider::stream_to`] that yield [`Chunk`]s ending in exactly one final chunk.
//! [`Client`] adds profile-based dispatch on top of a [`config::Configuration`].

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod stream;
pub mod types;

pub use client::{Client, Prompt, ProviderKind};
pub use config::{Configuration, Profile, ProviderSettings};
pub use error::LLMError;
pub use provider::{ChunkStream, LLMProvider};
pub use types::*;
