use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_workers: {0}. Must be between 1 and 64")]
    InvalidMaxWorkers(usize),

    #[error("Invalid timeout_secs: {0}. Must be positive")]
    InvalidTimeout(u64),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Cache directory cannot be empty when the persistent tier is enabled")]
    EmptyCacheDir,

    #[error("Model identifier cannot be empty")]
    EmptyModel,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .dealscope/config.yaml (project config)
    /// 3. .dealscope/local.yaml (project local overrides, optional)
    /// 4. Environment variables (DEALSCOPE_* prefix, highest priority)
    ///
    /// Configuration is project-local (pwd/.dealscope/) so multiple analysis
    /// runs on one machine can point at different caches and models.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".dealscope/config.yaml"))
            .merge(Yaml::file(".dealscope/local.yaml"))
            .merge(Env::prefixed("DEALSCOPE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("DEALSCOPE_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.model.is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        if config.orchestrator.max_workers == 0 || config.orchestrator.max_workers > 64 {
            return Err(ConfigError::InvalidMaxWorkers(
                config.orchestrator.max_workers,
            ));
        }

        if config.completion.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.completion.timeout_secs));
        }

        if let Some(temperature) = config.completion.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::InvalidTemperature(temperature));
            }
        }

        if !config.cache.disabled && config.cache.dir.is_empty() {
            return Err(ConfigError::EmptyCacheDir);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_validate_zero_workers() {
        let mut config = Config::default();
        config.orchestrator.max_workers = 0;

        let result = ConfigLoader::validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidMaxWorkers(0))));
    }

    #[test]
    fn test_validate_too_many_workers() {
        let mut config = Config::default();
        config.orchestrator.max_workers = 65;

        let result = ConfigLoader::validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidMaxWorkers(65))));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.completion.timeout_secs = 0;

        let result = ConfigLoader::validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidTimeout(0))));
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = Config::default();
        config.completion.temperature = Some(2.5);
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTemperature(_))
        ));

        config.completion.temperature = Some(0.0);
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "verbose"),
            other => panic!("expected InvalidLogLevel, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_validate_empty_cache_dir() {
        let mut config = Config::default();
        config.cache.dir = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyCacheDir)
        ));

        // A disabled persistent tier does not need a directory
        config.cache.disabled = true;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "model: m-base\nlogging:\n  level: info\n  format: pretty"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "model: m-override\nlogging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.model, "m-override", "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "pretty",
            "Base value should persist when not overridden"
        );
    }
}
