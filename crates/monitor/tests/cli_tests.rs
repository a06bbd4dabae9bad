//! CLI integration tests

use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

fn monitor() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cpu-monitor"));
    cmd.env_remove("CPU_MONITOR_THRESHOLD")
        .env_remove("CPU_MONITOR_INTERVAL")
        .env_remove("CPU_MONITOR_RETRY_BACKOFF")
        .env_remove("CPU_MONITOR_MAX_CONSECUTIVE_FAILURES");
    cmd
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = monitor().arg("--help").output().expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("CPU Health Monitoring System"), "Should show app name");
    assert!(stdout.contains("--threshold"), "Should show threshold flag");
    assert!(stdout.contains("--interval"), "Should show interval flag");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = monitor().arg("--version").output().expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("cpu-monitor"), "Should show binary name");
}

/// Out-of-range threshold fails before monitoring starts
#[test]
fn test_invalid_threshold_exits_nonzero() {
    let output = monitor()
        .args(["--threshold", "150"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("threshold must be a percentage"), "stderr: {}", stderr);
    assert!(!stdout.contains("Monitoring CPU usage"), "Loop must not start");
}

/// Negative interval fails before monitoring starts
#[test]
fn test_negative_interval_exits_nonzero() {
    let output = monitor()
        .args(["--interval", "-1"])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("interval must be a positive"), "stderr: {}", stderr);
}

/// Invalid environment configuration is a startup failure
#[test]
fn test_invalid_env_exits_nonzero() {
    let output = monitor()
        .env("CPU_MONITOR_THRESHOLD", "lots")
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("CPU_MONITOR"), "stderr: {}", stderr);
}

/// Missing procfs with an explicit procfs source is a startup failure
#[test]
fn test_missing_procfs_exits_nonzero() {
    let output = monitor()
        .args(["--source", "procfs", "--proc-root", "/nonexistent/proc"])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("No usable CPU metric source"), "stderr: {}", stderr);
}

/// Interval too large to represent fails cleanly instead of panicking
#[test]
fn test_huge_interval_exits_nonzero() {
    let output = monitor()
        .args(["--interval", "1e20"])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Program failed to start"), "stderr: {}", stderr);
    assert!(!stderr.contains("panicked"), "stderr: {}", stderr);
}

/// Zero failure budget is rejected at startup
#[test]
fn test_zero_failure_budget_exits_nonzero() {
    let output = monitor()
        .args(["--max-consecutive-failures", "0"])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("max consecutive failures"), "stderr: {}", stderr);
}

/// Run the monitor against a fake procfs, send `signal`, and return its stdout
#[cfg(unix)]
fn run_until_signal(signal: &str) -> (std::process::ExitStatus, String) {
    let proc_dir = tempfile::TempDir::new().unwrap();
    std::fs::write(proc_dir.path().join("stat"), "cpu  10 0 10 80 0 0 0 0 0 0\n").unwrap();

    let child = monitor()
        .args(["--source", "procfs", "--interval", "0.2", "--no-color"])
        .arg("--proc-root")
        .arg(proc_dir.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn monitor");

    thread::sleep(Duration::from_millis(2500));

    let status = Command::new("kill")
        .args([signal, &child.id().to_string()])
        .status()
        .expect("Failed to send signal");
    assert!(status.success());

    let output = child.wait_with_output().expect("Failed to wait for monitor");
    (output.status, String::from_utf8_lossy(&output.stdout).into_owned())
}

/// SIGINT drains the loop and prints the summary
#[cfg(unix)]
#[test]
fn test_sigint_prints_summary() {
    let (status, stdout) = run_until_signal("-INT");

    assert!(status.success(), "Graceful shutdown should exit 0");
    assert!(stdout.contains("Threshold: 80%"));
    assert!(stdout.contains("CPU Usage:"));
    assert!(stdout.contains("Status: NORMAL"));
    assert!(stdout.contains("Monitoring Summary"));
    assert!(stdout.contains("Total alerts triggered: 0"));
}

/// SIGTERM shuts down as gracefully as SIGINT
#[cfg(unix)]
#[test]
fn test_sigterm_prints_summary() {
    let (status, stdout) = run_until_signal("-TERM");

    assert!(status.success(), "Graceful shutdown should exit 0");
    assert!(stdout.contains("CPU Usage:"));
    assert!(stdout.contains("Received shutdown request"));
    assert!(stdout.contains("Monitoring Summary"));
    assert!(stdout.contains("Total alerts triggered: 0"));
}
