//! Completion service port: request types, error taxonomy, client trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single message in a completion conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author ("system" or "user")
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// One request to the completion service
///
/// Carries the model, the system/user message pair, and an optional sampling
/// temperature. The temperature is serialized only when present so that
/// models rejecting the parameter can be retried with it removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,

    /// Conversation messages (system prompt followed by user prompt)
    pub messages: Vec<Message>,

    /// Sampling temperature, included only when explicitly configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl CompletionRequest {
    /// Build a request from a system/user prompt pair.
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.into(),
                },
                Message {
                    role: "user".to_string(),
                    content: user.into(),
                },
            ],
            temperature: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Closed set of completion failure kinds, classified at the transport
/// boundary so the retry policy branches on typed kinds rather than
/// provider prose.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The target model rejected a request parameter (e.g. temperature)
    #[error("parameter rejected by model: {0}")]
    UnsupportedParameter(String),

    /// Rate limit exceeded, retry after waiting
    #[error("rate limit exceeded")]
    RateLimited,

    /// Request timed out waiting for a response
    #[error("timed out waiting for completion")]
    Timeout,

    /// Invalid request parameters or malformed request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed due to invalid or missing credentials
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The service reported an internal error
    #[error("service error (HTTP {status}): {body}")]
    ServerError { status: u16, body: String },

    /// The service is overloaded, retry later
    #[error("service overloaded")]
    Overloaded,

    /// Network error during the request
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Malformed response payload
    #[error("malformed service response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unclassified failure
    #[error("unclassified service failure: {0}")]
    Unknown(String),
}

impl CompletionError {
    /// Returns true if this error is worth retrying.
    ///
    /// Transient: rate limits, timeouts, 5xx, overload, network faults, and
    /// anything unclassified. Permanent: invalid requests, auth failures,
    /// malformed payloads. `UnsupportedParameter` is neither — it is handled
    /// by the one-shot parameter-downgrade retry instead.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CompletionError::RateLimited
                | CompletionError::Timeout
                | CompletionError::ServerError { .. }
                | CompletionError::Overloaded
                | CompletionError::Network(_)
                | CompletionError::Unknown(_)
        )
    }
}

/// Port trait for the external text-generation service
///
/// Implementations must be `Send + Sync`; methods take `&self` so concurrent
/// tasks can share one client. The client returns the raw response text —
/// parsing into a structured mapping happens above this boundary.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one request and return the raw generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_message_pair() {
        let request = CompletionRequest::new("m1", "be brief", "hello");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert!(request.temperature.is_none());
    }

    #[test]
    fn test_temperature_serialized_only_when_present() {
        let bare = CompletionRequest::new("m1", "s", "u");
        let json = serde_json::to_string(&bare).unwrap();
        assert!(!json.contains("temperature"));

        let warm = bare.with_temperature(0.4);
        let json = serde_json::to_string(&warm).unwrap();
        assert!(json.contains("\"temperature\":0.4"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(CompletionError::RateLimited.is_transient());
        assert!(CompletionError::Timeout.is_transient());
        assert!(CompletionError::Overloaded.is_transient());
        assert!(CompletionError::ServerError {
            status: 500,
            body: String::new()
        }
        .is_transient());
        assert!(CompletionError::Unknown("?".to_string()).is_transient());

        assert!(!CompletionError::InvalidRequest("bad".to_string()).is_transient());
        assert!(!CompletionError::AuthenticationFailed("key".to_string()).is_transient());
        assert!(!CompletionError::UnsupportedParameter("temperature".to_string()).is_transient());
    }
}
