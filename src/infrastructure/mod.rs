//! Infrastructure layer module
//!
//! Adapters and external integrations:
//! - Configuration management (figment)
//! - Logging (tracing)
//! - Two-tier request cache (in-memory + file-per-key)
//! - OpenAI-compatible completion client (reqwest)
//! - Scripted completion client for tests and demos
//!
//! Infrastructure implementations satisfy the port traits defined in the
//! domain layer.

pub mod cache;
pub mod completion_static;
pub mod config;
pub mod logging;
pub mod openai;
