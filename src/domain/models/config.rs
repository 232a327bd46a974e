use serde::{Deserialize, Serialize};

/// Main configuration structure for dealscope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Model identifier passed to the completion service
    #[serde(default = "default_model")]
    pub model: String,

    /// Completion service configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Request cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Orchestrator configuration
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_model() -> String {
    "gpt-5".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            completion: CompletionConfig::default(),
            cache: CacheConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompletionConfig {
    /// API key (can also be set via the OPENAI_API_KEY env var).
    /// Absent key degrades every call to a labeled offline result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL for the completion API (for testing/proxies)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum retry attempts after the first call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Sampling temperature. Unset by default for maximum model
    /// compatibility; models that reject it trigger a downgrade retry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Pre-seeded response body. When set, every call parses this string
    /// instead of reaching the network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline_response: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

const fn default_max_retries() -> u32 {
    2
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            temperature: None,
            offline_response: None,
        }
    }
}

impl CompletionConfig {
    /// Resolve the API key from config or the `OPENAI_API_KEY` env var.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }
}

/// Request cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Directory holding one file per cache key
    #[serde(default = "default_cache_dir")]
    pub dir: String,

    /// Disable the persistent tier entirely (in-memory tier stays active)
    #[serde(default)]
    pub disabled: bool,

    /// Entry time-to-live in seconds; <= 0 means entries never go stale
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: i64,
}

fn default_cache_dir() -> String {
    ".dealscope/cache".to_string()
}

const fn default_cache_ttl_secs() -> i64 {
    86_400
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            disabled: false,
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OrchestratorConfig {
    /// Maximum number of concurrently running tasks (1-64)
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

const fn default_max_workers() -> usize {
    4
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional directory for daily-rolling log files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
