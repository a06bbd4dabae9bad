//! Observability infrastructure for the monitor
//!
//! Provides:
//! - Tracing subscriber setup (text or JSON, filtered by `RUST_LOG`)
//! - Structured event logging for the monitoring lifecycle
//!
//! Diagnostics go to stderr so they never interleave with the status lines
//! the console reporter prints on stdout.

use crate::error::SamplingError;
use crate::models::{MonitorConfig, Reading, RunSummary, StopReason};
use std::str::FromStr;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}

/// Install the global tracing subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_err() {
        debug!("Tracing subscriber already installed");
    }
}

/// Structured logger for monitor events
///
/// Gives every lifecycle event a stable `event` field so JSON logs can be
/// filtered without parsing messages.
#[derive(Clone)]
pub struct MonitorLogger {
    host: String,
}

impl MonitorLogger {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Logger tagged with this machine's hostname
    pub fn for_local_host() -> Self {
        let host = sysinfo::System::host_name().unwrap_or_else(|| "unknown".to_string());
        Self::new(host)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Log monitor startup
    pub fn log_startup(&self, version: &str, sampler: &str, config: &MonitorConfig) {
        info!(
            event = "monitor_started",
            host = %self.host,
            version = %version,
            sampler = %sampler,
            threshold = config.threshold(),
            interval_secs = config.interval().as_secs_f64(),
            retry_backoff_secs = config.retry_backoff().as_secs_f64(),
            max_consecutive_failures = ?config.max_consecutive_failures(),
            "CPU monitor started"
        );
    }

    /// Log a single reading
    pub fn log_reading(&self, reading: Reading, threshold: f64) {
        debug!(
            event = "cpu_reading",
            host = %self.host,
            cpu_percent = reading.percent(),
            threshold = threshold,
            "CPU reading"
        );
    }

    /// Log a threshold breach
    pub fn log_alert(&self, reading: Reading, threshold: f64, alert_count: u64) {
        warn!(
            event = "cpu_alert",
            host = %self.host,
            cpu_percent = reading.percent(),
            threshold = threshold,
            alert_count = alert_count,
            "CPU usage above threshold"
        );
    }

    /// Log a failed sample
    pub fn log_sampling_error(&self, error: &SamplingError, consecutive_failures: u32) {
        warn!(
            event = "sampling_failed",
            host = %self.host,
            error = %error,
            consecutive_failures = consecutive_failures,
            "Failed to sample CPU usage, will retry"
        );
    }

    /// Log monitor shutdown
    pub fn log_shutdown(&self, reason: &StopReason) {
        match reason {
            StopReason::Signal => info!(
                event = "monitor_shutdown",
                host = %self.host,
                reason = %reason,
                "CPU monitor shutting down"
            ),
            StopReason::Fatal(_) => warn!(
                event = "monitor_shutdown",
                host = %self.host,
                reason = %reason,
                "CPU monitor stopping after fatal error"
            ),
        }
    }

    /// Log the final totals
    pub fn log_summary(&self, summary: &RunSummary) {
        info!(
            event = "monitor_summary",
            host = %self.host,
            alert_count = summary.alert_count,
            cycles = summary.cycles,
            sampling_errors = summary.sampling_errors,
            "CPU monitor stopped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("TEXT".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing(LogFormat::Text);
        init_tracing(LogFormat::Json);
    }

    #[test]
    fn test_monitor_logger_creation() {
        let logger = MonitorLogger::new("test-host");
        assert_eq!(logger.host(), "test-host");

        logger.log_alert(Reading(91.0), 80.0, 1);
        logger.log_shutdown(&StopReason::Signal);
    }
}
