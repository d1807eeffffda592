use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid precision: {0}. Must be positive and finite")]
    InvalidPrecision(f64),

    #[error("Invalid size_ratio: {0}. Must be positive and finite")]
    InvalidSizeRatio(f64),

    #[error("Invalid pool_size: {0}. Must be at least 1")]
    InvalidPoolSize(usize),

    #[error("Invalid nodes: {0}. Must be at least 1")]
    InvalidNodes(usize),

    #[error("Invalid lmax: {0}. Must be at least 1")]
    InvalidLmax(u32),

    #[error("Invalid pacing: idle_ms must be at least 1")]
    InvalidIdleInterval,

    #[error("Invalid pacing: max_idle_ms ({1}) must not be less than idle_ms ({0})")]
    InvalidIdleBounds(u64, u64),

    #[error("Invalid pacing multiplier: {0}. Must be at least 1")]
    InvalidMultiplier(f64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Evaluator program cannot be empty")]
    EmptyEvaluatorProgram,
}

const PROJECT_CONFIG: &str = ".casimir/config.yaml";
const LOCAL_CONFIG: &str = ".casimir/local.yaml";
const ENV_PREFIX: &str = "CASIMIR_";

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .casimir/config.yaml (project config)
    /// 3. .casimir/local.yaml (local overrides, optional)
    /// 4. Environment variables (CASIMIR_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Self::project_figment()
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, environment still on top
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// `load_from_file` when a path is given, `load` otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    fn project_figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(PROJECT_CONFIG))
            .merge(Yaml::file(LOCAL_CONFIG))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if !(config.precision.is_finite() && config.precision > 0.0) {
            return Err(ConfigError::InvalidPrecision(config.precision));
        }

        if !(config.size_ratio.is_finite() && config.size_ratio > 0.0) {
            return Err(ConfigError::InvalidSizeRatio(config.size_ratio));
        }

        if config.pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize(config.pool_size));
        }

        if config.nodes == 0 {
            return Err(ConfigError::InvalidNodes(config.nodes));
        }

        if config.lmax == 0 {
            return Err(ConfigError::InvalidLmax(config.lmax));
        }

        // Pacing
        let pacing = &config.pacing;
        if pacing.idle_ms == 0 {
            return Err(ConfigError::InvalidIdleInterval);
        }
        if pacing.max_idle_ms < pacing.idle_ms {
            return Err(ConfigError::InvalidIdleBounds(
                pacing.idle_ms,
                pacing.max_idle_ms,
            ));
        }
        if !(pacing.multiplier >= 1.0) {
            return Err(ConfigError::InvalidMultiplier(pacing.multiplier));
        }

        // Logging
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(
                config.logging.rotation.clone(),
            ));
        }

        if config.evaluator.program.trim().is_empty() {
            return Err(ConfigError::EmptyEvaluatorProgram);
        }

        Ok(())
    }
}
