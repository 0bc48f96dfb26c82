//! Error types for the tutoring client.

use thiserror::Error;

/// Shared error type for every client-facing operation.
///
/// The variants map one-to-one onto how a failure must be surfaced to the
/// user: transient network notices, a forced re-login, a verbatim
/// server-supplied message, or a local hardware problem.
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    /// Transport-level failure: no response, connect/timeout error, or a
    /// non-2xx HTTP status. Never retried automatically.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with code 401. The stored session has already
    /// been invalidated by the time this error reaches the caller; retrying
    /// the same request without re-authenticating is invalid.
    #[error("session expired, please sign in again")]
    AuthExpired,

    /// Non-zero, non-401 envelope code. The message is server-supplied and
    /// shown verbatim.
    #[error("{0}")]
    Business(String),

    /// Camera, microphone, or audio-channel acquisition/permission failure.
    /// Purely local; never touches the session.
    #[error("resource error: {0}")]
    Resource(String),

    /// Persistent key-value store failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Business error, falling back to a generic text when the
    /// server sent an empty message
    pub fn business(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self::Business("request failed".to_string())
        } else {
            Self::Business(message)
        }
    }

    /// Creates a Resource error from any displayable cause
    pub fn resource(cause: impl std::fmt::Display) -> Self {
        Self::Resource(cause.to_string())
    }

    /// Creates a Storage error from any displayable cause
    pub fn storage(cause: impl std::fmt::Display) -> Self {
        Self::Storage(cause.to_string())
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
