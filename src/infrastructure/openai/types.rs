//! Wire types for the OpenAI-compatible chat completions endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{CompletionRequest, Message};

/// Request body for `POST /chat/completions`
///
/// JSON mode is always requested — the analysis prompts instruct the model
/// to answer with a JSON object and the parser upstream expects one.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub response_format: ResponseFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl From<&CompletionRequest> for ChatRequest {
    fn from(request: &CompletionRequest) -> Self {
        Self {
            model: request.model.clone(),
            messages: request.messages.clone(),
            response_format: ResponseFormat::json_object(),
            temperature: request.temperature,
        }
    }
}

/// `response_format` field of a chat request
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Response body for a successful chat completion
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

/// One generated choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Generated message within a choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub content: Option<String>,
}

/// Error envelope returned by the service on failure
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Structured error detail
///
/// `code` and `param` are the machine-readable fields the transport adapter
/// classifies on; `message` is prose and only carried for diagnostics.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
