//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber: env-filtered
//! json/pretty stdout output, with optional daily-rolling file output.

use anyhow::Result;
use std::io;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::models::config::LoggingConfig;

/// Holds the non-blocking writer guard so file logs keep flushing for the
/// life of the process.
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// Initialize the global tracing subscriber from configuration.
///
/// The returned guard must be kept alive by the caller; dropping it stops
/// the background file writer.
pub fn init(config: &LoggingConfig) -> Result<LogGuard> {
    let default_level = parse_log_level(&config.level)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let guard = if let Some(ref log_dir) = config.log_dir {
        let file_appender = rolling::daily(log_dir, "dealscope.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

        // File layer is always JSON for structured log shipping
        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking_file)
            .with_ansi(false)
            .with_target(true)
            .with_filter(env_filter.clone());

        match config.format.as_str() {
            "pretty" => {
                let stdout_layer = tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(io::stdout)
                    .with_target(true)
                    .with_filter(env_filter);
                tracing_subscriber::registry()
                    .with(file_layer)
                    .with(stdout_layer)
                    .init();
            }
            _ => {
                let stdout_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stdout)
                    .with_target(true)
                    .with_filter(env_filter);
                tracing_subscriber::registry()
                    .with(file_layer)
                    .with(stdout_layer)
                    .init();
            }
        }

        Some(guard)
    } else {
        match config.format.as_str() {
            "pretty" => {
                let stdout_layer = tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(io::stdout)
                    .with_target(true)
                    .with_filter(env_filter);
                tracing_subscriber::registry().with(stdout_layer).init();
            }
            _ => {
                let stdout_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stdout)
                    .with_target(true)
                    .with_filter(env_filter);
                tracing_subscriber::registry().with(stdout_layer).init();
            }
        }

        None
    };

    tracing::info!(
        level = %config.level,
        format = %config.format,
        file_output = config.log_dir.is_some(),
        "logger initialized"
    );

    Ok(LogGuard { _guard: guard })
}

/// Parse log level string to Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert!(matches!(parse_log_level("trace"), Ok(Level::TRACE)));
        assert!(matches!(parse_log_level("debug"), Ok(Level::DEBUG)));
        assert!(matches!(parse_log_level("info"), Ok(Level::INFO)));
        assert!(matches!(parse_log_level("warn"), Ok(Level::WARN)));
        assert!(matches!(parse_log_level("error"), Ok(Level::ERROR)));
        assert!(matches!(parse_log_level("WARN"), Ok(Level::WARN)));
        assert!(parse_log_level("invalid").is_err());
    }
}
