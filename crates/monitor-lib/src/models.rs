//! Core data models for the monitor

use crate::error::ConfigError;
use std::fmt;
use std::time::Duration;

/// Default alert threshold, in percent
pub const DEFAULT_THRESHOLD: f64 = 80.0;

/// Default time between cycle starts
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Pause after a failed sample before the next attempt
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Immutable monitor configuration
///
/// Built through [`MonitorConfig::new`], which rejects values that would
/// only fail later inside the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    threshold: f64,
    interval: Duration,
    retry_backoff: Duration,
    max_consecutive_failures: Option<u32>,
}

impl MonitorConfig {
    /// Validate and build a configuration
    ///
    /// `threshold` must be a finite percentage in 0..=100 and `interval_secs`
    /// a finite, strictly positive number of seconds.
    pub fn new(threshold: f64, interval_secs: f64) -> Result<Self, ConfigError> {
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        if !interval_secs.is_finite() || interval_secs <= 0.0 {
            return Err(ConfigError::InvalidInterval(interval_secs));
        }

        let interval = Duration::try_from_secs_f64(interval_secs)
            .map_err(|_| ConfigError::InvalidInterval(interval_secs))?;

        Ok(Self {
            threshold,
            interval,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            max_consecutive_failures: None,
        })
    }

    /// Override the backoff applied after a sampling error
    pub fn with_retry_backoff(mut self, backoff_secs: f64) -> Result<Self, ConfigError> {
        if !backoff_secs.is_finite() || backoff_secs < 0.0 {
            return Err(ConfigError::InvalidBackoff(backoff_secs));
        }
        self.retry_backoff = Duration::try_from_secs_f64(backoff_secs)
            .map_err(|_| ConfigError::InvalidBackoff(backoff_secs))?;
        Ok(self)
    }

    /// Stop the loop once this many samples in a row have failed
    ///
    /// `None` (the default) retries forever. A limit of zero is rejected.
    pub fn with_max_consecutive_failures(
        mut self,
        limit: Option<u32>,
    ) -> Result<Self, ConfigError> {
        if limit == Some(0) {
            return Err(ConfigError::InvalidFailureBudget);
        }
        self.max_consecutive_failures = limit;
        Ok(self)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn retry_backoff(&self) -> Duration {
        self.retry_backoff
    }

    pub fn max_consecutive_failures(&self) -> Option<u32> {
        self.max_consecutive_failures
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            interval: DEFAULT_INTERVAL,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            max_consecutive_failures: None,
        }
    }
}

/// One CPU utilization sample, in percent
///
/// Values outside 0..=100 are kept as reported; the OS counters can
/// briefly produce them and downstream code handles them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Reading(pub f64);

impl Reading {
    pub fn percent(self) -> f64 {
        self.0
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// Reading status relative to the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Normal,
    High,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Normal => "NORMAL",
            Status::High => "HIGH",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Outcome of classifying one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: Status,
    pub is_alert: bool,
}

/// Why the loop left the running phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Shutdown was requested through the shutdown flag
    Signal,
    /// The cycle loop gave up with an unrecoverable error
    Fatal(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Signal => write!(f, "shutdown requested"),
            StopReason::Fatal(message) => write!(f, "fatal error: {}", message),
        }
    }
}

/// Totals reported when the monitor stops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub alert_count: u64,
    pub cycles: u64,
    pub sampling_errors: u64,
    pub stop_reason: StopReason,
}
