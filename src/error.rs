use thiserror::Error;

/// Aggregates every failure mode exposed by the completion adapters and the dispatch client.
///
/// Adapters translate each vendor failure into exactly one variant and return it
/// immediately; nothing in the crate retries.
#[derive(Debug, Error)]
pub enum LLMError {
    /// The local service could not be reached at all.
    ///
    /// Only the Ollama adapter produces this variant; the message carries a hint that the
    /// service may not be running.
    #[error("connection error: {message}")]
    Connection { message: String },
    /// The vendor rejected the credentials (HTTP 401).
    #[error("authentication failed: {message}")]
    Authentication { message: String },
    /// Any other vendor-reported failure.
    #[error("provider {provider} error: {message}")]
    Provider {
        /// Name of the adapter, such as `openai_chat`.
        provider: &'static str,
        /// HTTP status when the failure came from a non-success response.
        status: Option<u16>,
        /// Human-readable message, including vendor detail when available.
        message: String,
    },
    /// Represents transport-layer or networking failures.
    #[error("transport error: {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },
    /// Signals that the request payload could not be built.
    #[error("invalid request: {message}")]
    Validation { message: String },
    /// No profile name was given and no default profile is configured.
    #[error("no default profile configured")]
    NoDefaultProfile,
    /// The requested profile does not exist.
    #[error("profile '{name}' is not configured")]
    ProfileNotFound { name: String },
    /// A profile references a provider that has no settings or no adapter.
    #[error("{message}")]
    ProviderNotConfigured { message: String },
    /// Raised when reading or parsing configuration fails.
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// Name of the configuration field that failed validation.
        field: String,
        /// Additional context explaining why the field is invalid.
        reason: String,
    },
}

/// Coarse classification of transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The TCP/TLS connection could not be established.
    Connect,
    /// The request exceeded its timeout.
    Timeout,
    /// Anything else, such as a reset connection mid-body.
    Other,
}

impl LLMError {
    /// Creates an [`LLMError::Transport`] of kind [`TransportErrorKind::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// use parley_llm::error::{LLMError, TransportErrorKind};
    ///
    /// let err = LLMError::transport("connection reset");
    /// assert!(matches!(err, LLMError::Transport { kind: TransportErrorKind::Other, .. }));
    /// ```
    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            kind: TransportErrorKind::Other,
            message: message.into(),
        }
    }

    /// Creates an [`LLMError::Provider`] that is not tied to an HTTP status.
    ///
    /// # Examples
    ///
    /// ```
    /// use parley_llm::error::LLMError;
    ///
    /// let err = LLMError::provider("openai_chat", "bad JSON payload");
    /// assert!(matches!(err, LLMError::Provider { provider: "openai_chat", status: None, .. }));
    /// ```
    pub fn provider<T: Into<String>>(provider: &'static str, message: T) -> Self {
        Self::Provider {
            provider,
            status: None,
            message: message.into(),
        }
    }

    /// Returns `true` when the transport failed to establish a connection.
    pub fn is_connect(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportErrorKind::Connect,
                ..
            }
        )
    }
}

/// Maps a non-success HTTP status to the shared error taxonomy.
///
/// `fallback` formats the message for statuses other than 401 and 429 so each vendor
/// keeps its own wording.
pub(crate) fn status_error(
    provider: &'static str,
    status: u16,
    message: &str,
    fallback: impl FnOnce(u16, &str) -> String,
) -> LLMError {
    tracing::warn!(provider, status, "provider returned an error status");
    match status {
        401 => LLMError::Authentication {
            message: format!("Invalid API key: {message}"),
        },
        429 => LLMError::Provider {
            provider,
            status: Some(status),
            message: format!("Rate limited: {message}"),
        },
        _ => LLMError::Provider {
            provider,
            status: Some(status),
            message: fallback(status, message),
        },
    }
}
