//! Dealscope - Startup Analysis Pipeline
//!
//! Dealscope ingests a freeform startup description, fans it out to several
//! independent text-generation calls, and aggregates the results into a
//! multi-field report. The engineering core is a memoizing request cache
//! plus a dependency-aware concurrent task orchestrator.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure models, the task graph, and ports
//! - **Service Layer** (`services`): Completion memoization/retry and
//!   graph orchestration
//! - **Infrastructure Layer** (`infrastructure`): Config, logging, cache
//!   storage, and the HTTP completion client
//! - **Analysts** (`analysts`): Collaborator prompt builders and the report
//!   pipeline
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dealscope::analysts::StartupAnalyzer;
//! use dealscope::domain::models::Config;
//! use dealscope::infrastructure::cache::RequestCache;
//! use dealscope::services::{CompletionService, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let cache = Arc::new(RequestCache::new(&config.cache));
//!     let service = Arc::new(CompletionService::new(None, cache, &config));
//!     let analyzer = StartupAnalyzer::new(service, Orchestrator::default(), &config);
//!     let report = analyzer.analyze("Acme builds widgets for ...").await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod analysts;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use analysts::{AnalysisMode, StartupAnalyzer};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AnalysisGraph, CacheConfig, CompletionConfig, Config, LoggingConfig, OrchestratorConfig,
    Task, TaskInputs, TaskStatus,
};
pub use domain::ports::{CompletionClient, CompletionError, CompletionRequest, Message};
pub use infrastructure::cache::{request_key, RequestCache};
pub use infrastructure::completion_static::StaticCompletionClient;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{offline_sentinel, parse_structured, CompletionService, Orchestrator};
