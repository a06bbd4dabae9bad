//! Console reporting
//!
//! Renders the banner, one status line per reading, alert lines, sampling
//! errors and the final summary. Output is best effort: write failures are
//! ignored so a closed terminal never stops the monitor.

use crate::error::SamplingError;
use crate::models::{MonitorConfig, Reading, RunSummary, Status, StopReason};
use colored::{ColoredString, Colorize};
use std::io::{self, IsTerminal, Stdout, Write};
use std::time::Duration;

const RULE_WIDTH: usize = 50;

/// Sink for everything the monitor shows to the operator
pub trait Reporter: Send {
    /// Header printed once before the first cycle
    fn banner(&mut self, config: &MonitorConfig);

    /// One status line for a reading
    fn report(&mut self, reading: Reading, status: Status);

    /// Separate line for a reading above the threshold
    fn report_alert(&mut self, reading: Reading);

    /// A failed sample and the pause before the next attempt
    fn report_error(&mut self, error: &SamplingError, backoff: Duration);

    /// The loop is leaving the running phase
    fn report_shutdown(&mut self, reason: &StopReason);

    /// Final totals
    fn report_summary(&mut self, summary: &RunSummary);
}

/// Human-readable reporter writing to a terminal or any writer
pub struct ConsoleReporter<W> {
    out: W,
    color: bool,
}

impl ConsoleReporter<Stdout> {
    /// Reporter on stdout, coloured when stdout is a terminal
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Self { out, color }
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Reporter on an arbitrary writer, without colour
    pub fn new(out: W) -> Self {
        Self { out, color: false }
    }

    /// Force colour on or off
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn rule(&mut self) {
        let _ = writeln!(self.out, "{}", "=".repeat(RULE_WIDTH));
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn banner(&mut self, config: &MonitorConfig) {
        let title = self.paint("🔍 CPU Health Monitoring System", |s| s.bold());

        self.rule();
        let _ = writeln!(self.out, "{}", title);
        self.rule();
        let _ = writeln!(self.out, "Threshold: {}%", config.threshold());
        let _ = writeln!(
            self.out,
            "Check Interval: {} seconds",
            format_seconds(config.interval())
        );
        let _ = writeln!(self.out, "Press Ctrl+C to stop monitoring");
        self.rule();
        let _ = writeln!(self.out, "Monitoring CPU usage...\n");
        let _ = self.out.flush();
    }

    fn report(&mut self, reading: Reading, status: Status) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        let (label, marker) = match status {
            Status::Normal => (self.paint(&format!("{:6}", status), |s| s.green()), "✅"),
            Status::High => (self.paint(&format!("{:6}", status), |s| s.red().bold()), "🚨"),
        };

        let _ = writeln!(
            self.out,
            "[{}] CPU Usage: {:6.1}% | Status: {} {}",
            timestamp,
            reading.percent(),
            label,
            marker
        );
        let _ = self.out.flush();
    }

    fn report_alert(&mut self, reading: Reading) {
        let line = self.paint(
            &format!("Alert! CPU usage exceeds threshold: {}", reading),
            |s| s.red().bold(),
        );
        let _ = writeln!(self.out, "{}", line);
        let _ = self.out.flush();
    }

    fn report_error(&mut self, error: &SamplingError, backoff: Duration) {
        let line = self.paint(&format!("Monitoring error: {}", error), |s| s.yellow());
        let _ = writeln!(self.out, "{}", line);
        let _ = writeln!(
            self.out,
            "Retrying in {} seconds...",
            format_seconds(backoff)
        );
        let _ = self.out.flush();
    }

    fn report_shutdown(&mut self, reason: &StopReason) {
        let line = match reason {
            StopReason::Signal => "Received shutdown request. Stopping monitor...".to_string(),
            StopReason::Fatal(message) => self.paint(
                &format!("Fatal error in monitoring loop: {}", message),
                |s| s.red().bold(),
            ),
        };
        let _ = writeln!(self.out, "\n{}", line);
        let _ = self.out.flush();
    }

    fn report_summary(&mut self, summary: &RunSummary) {
        let title = self.paint("📊 Monitoring Summary", |s| s.bold());

        let _ = writeln!(self.out);
        self.rule();
        let _ = writeln!(self.out, "{}", title);
        self.rule();
        let _ = writeln!(self.out, "Total alerts triggered: {}", summary.alert_count);
        let _ = writeln!(self.out, "Checks completed: {}", summary.cycles);
        if summary.sampling_errors > 0 {
            let _ = writeln!(self.out, "Sampling errors: {}", summary.sampling_errors);
        }
        let _ = writeln!(self.out, "CPU monitoring stopped.");
        self.rule();
        let _ = self.out.flush();
    }
}

/// Render a duration as whole seconds when possible
fn format_seconds(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs.fract() == 0.0 {
        format!("{}", secs as u64)
    } else {
        format!("{:.2}", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut ConsoleReporter<Vec<u8>>)) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new());
        f(&mut reporter);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    fn summary(alert_count: u64) -> RunSummary {
        RunSummary {
            alert_count,
            cycles: 5,
            sampling_errors: 0,
            stop_reason: StopReason::Signal,
        }
    }

    #[test]
    fn test_banner_shows_configuration() {
        let config = MonitorConfig::new(75.0, 2.0).unwrap();
        let out = render(|r| r.banner(&config));

        assert!(out.contains("CPU Health Monitoring System"));
        assert!(out.contains("Threshold: 75%"));
        assert!(out.contains("Check Interval: 2 seconds"));
        assert!(out.contains("Ctrl+C"));
    }

    #[test]
    fn test_report_normal_line() {
        let out = render(|r| r.report(Reading(42.26), Status::Normal));

        assert!(out.contains("CPU Usage:   42.3% | Status: NORMAL ✅"), "{}", out);
        assert!(out.starts_with('['));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_report_high_line() {
        let out = render(|r| r.report(Reading(93.0), Status::High));
        assert!(out.contains("CPU Usage:   93.0% | Status: HIGH   🚨"), "{}", out);
    }

    #[test]
    fn test_report_alert_line() {
        let out = render(|r| r.report_alert(Reading(85.04)));
        assert_eq!(out, "Alert! CPU usage exceeds threshold: 85.0%\n");
    }

    #[test]
    fn test_report_error_mentions_backoff() {
        let out = render(|r| {
            r.report_error(&SamplingError::Unsupported, Duration::from_secs(5))
        });

        assert!(out.contains("Monitoring error: CPU metrics are not supported"));
        assert!(out.contains("Retrying in 5 seconds..."));
    }

    #[test]
    fn test_report_shutdown_fatal() {
        let out = render(|r| r.report_shutdown(&StopReason::Fatal("boom".to_string())));
        assert!(out.contains("Fatal error in monitoring loop: boom"));
    }

    #[test]
    fn test_summary_reports_alert_count() {
        let out = render(|r| r.report_summary(&summary(3)));

        assert!(out.contains("Monitoring Summary"));
        assert!(out.contains("Total alerts triggered: 3"));
        assert!(out.contains("Checks completed: 5"));
        assert!(!out.contains("Sampling errors"));
        assert!(out.contains("CPU monitoring stopped."));
    }

    #[test]
    fn test_summary_zero_cycles() {
        let empty = RunSummary {
            alert_count: 0,
            cycles: 0,
            sampling_errors: 2,
            stop_reason: StopReason::Signal,
        };
        let out = render(|r| r.report_summary(&empty));

        assert!(out.contains("Total alerts triggered: 0"));
        assert!(out.contains("Sampling errors: 2"));
    }

    #[test]
    fn test_color_adds_escape_codes() {
        colored::control::set_override(true);
        let mut reporter = ConsoleReporter::new(Vec::new()).with_color(true);
        reporter.report_alert(Reading(90.0));
        let out = String::from_utf8(reporter.into_inner()).unwrap();

        assert!(out.contains("\u{1b}["));
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(Duration::from_secs(5)), "5");
        assert_eq!(format_seconds(Duration::from_millis(1500)), "1.50");
    }
}
