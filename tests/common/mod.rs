#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::stream;
use parley_llm::error::LLMError;
use parley_llm::http::{
    DynHttpTransport, HttpRequest, HttpResponse, HttpStreamResponse, HttpTransport,
};
use serde_json::Value;

/// In-memory transport that records every request and replays one canned response.
///
/// Streaming bodies are cut into reads of `read_size` bytes so decoders see lines and
/// multi-byte characters split at arbitrary points.
pub struct MockTransport {
    status: u16,
    body: Vec<u8>,
    read_size: usize,
    trailing_error: Option<String>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self::build(status, body.into(), usize::MAX, None))
    }

    /// Streams `body` in reads of at most `read_size` bytes.
    pub fn split(status: u16, body: impl Into<Vec<u8>>, read_size: usize) -> Arc<Self> {
        Arc::new(Self::build(status, body.into(), read_size.max(1), None))
    }

    /// Streams `body`, then fails the connection with a transport error.
    pub fn broken(body: impl Into<Vec<u8>>, message: &str) -> Arc<Self> {
        Arc::new(Self::build(200, body.into(), 7, Some(message.to_string())))
    }

    fn build(status: u16, body: Vec<u8>, read_size: usize, trailing_error: Option<String>) -> Self {
        Self {
            status,
            body,
            read_size,
            trailing_error,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("lock").clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("at least one request")
    }

    pub fn last_body(&self) -> Value {
        serde_json::from_slice(&self.last_request().body).expect("JSON request body")
    }

    fn record(&self, request: HttpRequest) {
        self.requests.lock().expect("lock").push(request);
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError> {
        self.record(request);
        Ok(HttpResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }

    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, LLMError> {
        self.record(request);
        let mut reads: Vec<Result<Vec<u8>, LLMError>> = self
            .body
            .chunks(self.read_size)
            .map(|read| Ok(read.to_vec()))
            .collect();
        if let Some(message) = &self.trailing_error {
            reads.push(Err(LLMError::transport(message.clone())));
        }
        Ok(HttpStreamResponse {
            status: self.status,
            body: Box::pin(stream::iter(reads)),
        })
    }
}

pub fn dyn_transport(transport: &Arc<MockTransport>) -> DynHttpTransport {
    transport.clone()
}

/// Read sizes used to replay transcripts: byte by byte, awkward primes, and whole.
pub const READ_SIZES: [usize; 5] = [1, 3, 17, 64, usize::MAX];
