//! Monitor configuration
//!
//! Values come from command-line flags, then `CPU_MONITOR_*` environment
//! variables, then built-in defaults. Validation happens once, here, so a
//! bad value stops the process before the loop starts.

use crate::cli::Cli;
use anyhow::{Context, Result};
use monitor_lib::{
    ConfigError, MonitorConfig, DEFAULT_INTERVAL, DEFAULT_RETRY_BACKOFF, DEFAULT_THRESHOLD,
};
use serde::Deserialize;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CPU_MONITOR";

/// Settings read from the environment
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnvSettings {
    /// `CPU_MONITOR_THRESHOLD`
    pub threshold: Option<f64>,

    /// `CPU_MONITOR_INTERVAL`
    pub interval: Option<f64>,

    /// `CPU_MONITOR_RETRY_BACKOFF`
    pub retry_backoff: Option<f64>,

    /// `CPU_MONITOR_MAX_CONSECUTIVE_FAILURES`
    pub max_consecutive_failures: Option<u32>,
}

impl EnvSettings {
    /// Load settings from the process environment
    pub fn load() -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(environment: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()
            .context("Failed to read environment")?;

        config
            .try_deserialize()
            .with_context(|| format!("Invalid {}_* environment variable", ENV_PREFIX))
    }
}

/// Merge flags over environment over defaults and validate the result
pub fn resolve(cli: &Cli, env: &EnvSettings) -> Result<MonitorConfig, ConfigError> {
    let threshold = cli.threshold.or(env.threshold).unwrap_or(DEFAULT_THRESHOLD);
    let interval = cli
        .interval
        .or(env.interval)
        .unwrap_or(DEFAULT_INTERVAL.as_secs_f64());
    let retry_backoff = cli
        .retry_backoff
        .or(env.retry_backoff)
        .unwrap_or(DEFAULT_RETRY_BACKOFF.as_secs_f64());
    let max_failures = cli.max_consecutive_failures.or(env.max_consecutive_failures);

    MonitorConfig::new(threshold, interval)?
        .with_retry_backoff(retry_backoff)?
        .with_max_consecutive_failures(max_failures)
}
