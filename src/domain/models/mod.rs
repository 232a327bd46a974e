//! Domain models for configuration and the analysis task graph.

pub mod config;
pub mod graph;

pub use config::{
    CacheConfig, CompletionConfig, Config, LoggingConfig, OrchestratorConfig,
};
pub use graph::{AnalysisGraph, Task, TaskInputs, TaskStatus};
