//! Scripted completion client for tests and offline demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{CompletionClient, CompletionError, CompletionRequest};

/// Completion client that replays scripted outcomes instead of calling a
/// network service.
///
/// Outcomes queued with [`push_response`](Self::push_response) and
/// [`push_error`](Self::push_error) are consumed in order; once the queue is
/// empty every call returns the default response. Every invocation is
/// counted and its request recorded, so tests can assert on call volume and
/// on what was actually sent (e.g. that a downgrade retry dropped the
/// temperature).
pub struct StaticCompletionClient {
    default_response: String,
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StaticCompletionClient {
    /// Create a client that answers every call with `default_response`.
    pub fn new(default_response: impl Into<String>) -> Self {
        Self {
            default_response: default_response.into(),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response for the next unscripted call.
    pub fn push_response(&self, text: impl Into<String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Ok(text.into()));
        }
    }

    /// Queue a failure for the next unscripted call.
    pub fn push_error(&self, error: CompletionError) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Err(error));
        }
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Every request seen so far, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for StaticCompletionClient {
    fn default() -> Self {
        Self::new("{}")
    }
}

#[async_trait]
impl CompletionClient for StaticCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match scripted {
            Some(outcome) => outcome,
            None => Ok(self.default_response.clone()),
        }
    }
}
