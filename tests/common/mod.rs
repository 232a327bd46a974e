//! Shared helpers for integration tests.

use std::sync::Arc;

use dealscope::{CompletionService, Config, RequestCache, StaticCompletionClient};

/// Build a completion service over a scripted client and an isolated
/// memory-only cache. Returns the client handle for call-count assertions.
pub fn scripted_service(default_response: &str) -> (Arc<StaticCompletionClient>, CompletionService) {
    scripted_service_with_config(default_response, &Config::default())
}

/// Same as [`scripted_service`] but with a caller-supplied config.
pub fn scripted_service_with_config(
    default_response: &str,
    config: &Config,
) -> (Arc<StaticCompletionClient>, CompletionService) {
    let client = Arc::new(StaticCompletionClient::new(default_response));
    let service = CompletionService::new(
        Some(client.clone()),
        Arc::new(RequestCache::in_memory()),
        config,
    );
    (client, service)
}

/// A service with no client at all — the offline-sentinel path.
pub fn offline_service() -> CompletionService {
    CompletionService::new(
        None,
        Arc::new(RequestCache::in_memory()),
        &Config::default(),
    )
}
