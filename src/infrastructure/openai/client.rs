//! HTTP client for an OpenAI-compatible chat completions endpoint.

use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{ChatRequest, ChatResponse, ErrorResponse};
use crate::domain::ports::{CompletionClient, CompletionError, CompletionRequest};

/// Configuration for the completion HTTP client
#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    /// API key for bearer authentication
    pub api_key: String,

    /// Base URL for the completion API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// HTTP client for the completion service
///
/// Connection pooling comes from the shared `reqwest::Client`; error
/// classification into the closed [`CompletionError`] kind set happens here,
/// at the transport boundary, so callers never inspect provider prose.
pub struct OpenAiClient {
    http_client: ReqwestClient,
    base_url: String,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(config: OpenAiClientConfig) -> Result<Self, CompletionError> {
        // Scrub the API key from logs
        let api_key_scrubbed = if config.api_key.len() > 8 {
            format!("{}...[REDACTED]", &config.api_key[..8])
        } else {
            "[REDACTED]".to_string()
        };
        debug!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            api_key = %api_key_scrubbed,
            "initializing completion client"
        );

        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| CompletionError::InvalidRequest(format!("invalid API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .default_headers(headers)
            .build()
            .map_err(CompletionError::Network)?;

        Ok(Self {
            http_client,
            base_url: config.base_url,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, "POST {url}");

        let response = self
            .http_client
            .post(&url)
            .json(&ChatRequest::from(request))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Network(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            warn!(%status, "completion request failed");
            return Err(classify_error(status, &body));
        }

        let parsed: ChatResponse = response.json().await.map_err(CompletionError::Network)?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        // An empty completion is treated as an empty JSON object downstream
        Ok(if text.is_empty() { "{}".to_string() } else { text })
    }
}

/// Classify an HTTP error response into a typed error kind.
///
/// A 400 whose structured body carries an `unsupported_*` code maps to
/// `UnsupportedParameter`, which is what drives the temperature-downgrade
/// retry upstream.
fn classify_error(status: StatusCode, body: &str) -> CompletionError {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|envelope| envelope.error);

    match status.as_u16() {
        400 => {
            if let Some(detail) = detail {
                let unsupported = detail
                    .code
                    .as_deref()
                    .is_some_and(|code| code.starts_with("unsupported"));
                if unsupported {
                    let param = detail
                        .param
                        .unwrap_or_else(|| detail.code.unwrap_or_default());
                    return CompletionError::UnsupportedParameter(param);
                }
                CompletionError::InvalidRequest(detail.message)
            } else {
                CompletionError::InvalidRequest(body.to_string())
            }
        }
        401 | 403 => CompletionError::AuthenticationFailed(
            detail.map_or_else(|| body.to_string(), |d| d.message),
        ),
        408 => CompletionError::Timeout,
        429 => CompletionError::RateLimited,
        503 => CompletionError::Overloaded,
        status_code if status.is_server_error() => CompletionError::ServerError {
            status: status_code,
            body: body.to_string(),
        },
        _ => CompletionError::Unknown(format!("HTTP {status}: {body}")),
    }
}
