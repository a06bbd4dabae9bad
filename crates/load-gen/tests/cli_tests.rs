//! CLI integration tests

use std::process::Command;
use std::time::{Duration, Instant};

fn cpu_load() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cpu-load"))
}

/// Test that the CLI shows help without the internal worker command
#[test]
fn test_cli_help() {
    let output = cpu_load().arg("--help").output().expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Generate CPU load"), "Should show about text");
    assert!(stdout.contains("--duration"), "Should show duration flag");
    assert!(stdout.contains("--workers"), "Should show workers flag");
    assert!(!stdout.contains("Burn CPU until"), "Worker command should be hidden");
}

/// A short run spawns workers and finishes on its own
#[test]
fn test_short_run_completes() {
    let start = Instant::now();
    let output = cpu_load()
        .args(["--duration", "1", "--workers", "2"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Load run should succeed");
    assert!(stdout.contains("Started 2 workers for 1 seconds"), "stdout: {}", stdout);
    assert!(stdout.contains("Load generation finished"));
    assert!(start.elapsed() < Duration::from_secs(10));
}

/// A worker with a past deadline exits immediately
#[test]
fn test_worker_past_deadline() {
    let output = cpu_load()
        .args(["worker", "--until-ms", "0"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
}
