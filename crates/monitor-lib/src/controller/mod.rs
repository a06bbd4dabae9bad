//! Monitoring loop
//!
//! Drives the monitor through `STARTING → RUNNING → STOPPING → STOPPED`.
//! Each running cycle samples the CPU, classifies and reports the reading,
//! counts alerts, then sleeps for the configured interval. Sampling errors
//! are reported and retried after a fixed backoff, forever unless a
//! consecutive-failure budget was configured.

mod shutdown;


pub use shutdown::ShutdownFlag;

use crate::classifier::classify;
use crate::error::{MonitorError, SamplingError};
use crate::models::{MonitorConfig, Reading, RunSummary, StopReason};
use crate::observability::MonitorLogger;
use crate::reporter::Reporter;
use crate::sampler::CpuSampler;
use std::fmt;
use tracing::debug;

const MONITOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lifecycle phase of a monitor run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Running,
    Stopping,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Starting => write!(f, "starting"),
            Phase::Running => write!(f, "running"),
            Phase::Stopping => write!(f, "stopping"),
            Phase::Stopped => write!(f, "stopped"),
        }
    }
}

/// Mutable counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    /// Readings classified HIGH; never decreases
    pub alert_count: u64,
    /// Successful readings
    pub cycles: u64,
    /// Failed samples over the whole run
    pub sampling_errors: u64,
    /// Failed samples since the last successful one
    pub consecutive_failures: u32,
}

impl MonitorState {
    fn summary(&self, stop_reason: StopReason) -> RunSummary {
        RunSummary {
            alert_count: self.alert_count,
            cycles: self.cycles,
            sampling_errors: self.sampling_errors,
            stop_reason,
        }
    }
}

/// CPU monitor owning the sampler, reporter and run state
pub struct Monitor {
    config: MonitorConfig,
    sampler: Box<dyn CpuSampler>,
    reporter: Box<dyn Reporter>,
    shutdown: ShutdownFlag,
    logger: MonitorLogger,
    state: MonitorState,
    phase: Phase,
}

impl Monitor {
    /// Create a monitor in the `STARTING` phase
    pub fn new(
        config: MonitorConfig,
        sampler: Box<dyn CpuSampler>,
        reporter: Box<dyn Reporter>,
        shutdown: ShutdownFlag,
    ) -> Self {
        Self {
            config,
            sampler,
            reporter,
            shutdown,
            logger: MonitorLogger::for_local_host(),
            state: MonitorState::default(),
            phase: Phase::Starting,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Handle for stopping this monitor from elsewhere
    pub fn shutdown_flag(&self) -> ShutdownFlag {
        self.shutdown.clone()
    }

    /// Run until shutdown is requested or the loop fails, then report totals
    pub async fn run(mut self) -> RunSummary {
        self.start();

        let stop_reason = match self.run_cycles().await {
            Ok(()) => StopReason::Signal,
            Err(e) => {
                self.shutdown.request_stop();
                StopReason::Fatal(e.to_string())
            }
        };

        self.stop(stop_reason)
    }

    fn start(&mut self) {
        self.reporter.banner(&self.config);
        self.logger
            .log_startup(MONITOR_VERSION, self.sampler.name(), &self.config);
        self.transition(Phase::Running);
    }

    async fn run_cycles(&mut self) -> Result<(), MonitorError> {
        while self.shutdown.is_running() {
            let pause = match self.sampler.sample().await {
                Ok(reading) => {
                    self.handle_reading(reading);
                    self.config.interval()
                }
                Err(e) => {
                    self.handle_sampling_error(e)?;
                    self.config.retry_backoff()
                }
            };

            if !self.shutdown.is_running() {
                break;
            }
            tokio::time::sleep(pause).await;
        }

        Ok(())
    }

    fn handle_reading(&mut self, reading: Reading) {
        let threshold = self.config.threshold();
        let classification = classify(reading, threshold);

        self.state.cycles += 1;
        self.state.consecutive_failures = 0;

        self.logger.log_reading(reading, threshold);
        self.reporter.report(reading, classification.status);

        if classification.is_alert {
            self.state.alert_count += 1;
            self.reporter.report_alert(reading);
            self.logger
                .log_alert(reading, threshold, self.state.alert_count);
        }
    }

    fn handle_sampling_error(&mut self, error: SamplingError) -> Result<(), MonitorError> {
        self.state.sampling_errors += 1;
        self.state.consecutive_failures += 1;
        self.logger
            .log_sampling_error(&error, self.state.consecutive_failures);

        if let Some(limit) = self.config.max_consecutive_failures() {
            if self.state.consecutive_failures >= limit {
                return Err(MonitorError::FailureBudgetExhausted {
                    failures: self.state.consecutive_failures,
                    last: error,
                });
            }
        }

        self.reporter
            .report_error(&error, self.config.retry_backoff());
        Ok(())
    }

    fn stop(&mut self, stop_reason: StopReason) -> RunSummary {
        self.transition(Phase::Stopping);
        self.reporter.report_shutdown(&stop_reason);
        self.logger.log_shutdown(&stop_reason);

        let summary = self.state.summary(stop_reason);

        self.transition(Phase::Stopped);
        self.reporter.report_summary(&summary);
        self.logger.log_summary(&summary);

        summary
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = %self.phase, to = %next, "Monitor phase change");
        self.phase = next;
    }
}

/// Builder for assembling a monitor
pub struct MonitorBuilder {
    config: MonitorConfig,
    sampler: Option<Box<dyn CpuSampler>>,
    reporter: Option<Box<dyn Reporter>>,
    shutdown: Option<ShutdownFlag>,
    logger: Option<MonitorLogger>,
}

impl MonitorBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: MonitorConfig::default(),
            sampler: None,
            reporter: None,
            shutdown: None,
            logger: None,
        }
    }

    /// Set the validated configuration
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the CPU sampler
    pub fn sampler(mut self, sampler: Box<dyn CpuSampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Set the reporter
    pub fn reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Share an existing shutdown flag, e.g. one already wired to signals
    pub fn shutdown(mut self, shutdown: ShutdownFlag) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Set the structured logger
    pub fn logger(mut self, logger: MonitorLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build the monitor
    pub fn build(self) -> Result<Monitor, MonitorError> {
        let sampler = self
            .sampler
            .ok_or(MonitorError::MissingComponent("sampler"))?;
        let reporter = self
            .reporter
            .ok_or(MonitorError::MissingComponent("reporter"))?;

        let mut monitor = Monitor::new(
            self.config,
            sampler,
            reporter,
            self.shutdown.unwrap_or_default(),
        );
        if let Some(logger) = self.logger {
            monitor.logger = logger;
        }

        Ok(monitor)
    }
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
