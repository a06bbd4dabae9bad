//! CPU load generator
//!
//! Spawns one worker process per CPU core, each spinning on integer
//! arithmetic until a deadline, to push host CPU usage above the monitor's
//! alert threshold. All workers are terminated on Ctrl+C or once the
//! deadline passes.

mod output;
mod worker;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use output::{format_workers, print_error, print_info, print_success, print_warning};
use std::process::{ExitCode, Stdio};
use std::thread;
use std::time::Duration;
use tokio::process::{Child, Command};

/// Extra time granted to workers past the deadline before they are killed
const DEADLINE_GRACE: Duration = Duration::from_secs(1);

/// CPU load generator
#[derive(Parser)]
#[command(name = "cpu-load")]
#[command(author, version, about = "Generate CPU load for testing the CPU monitor", long_about = None)]
struct Cli {
    /// Seconds to keep the CPU busy
    #[arg(long, short, default_value_t = 30)]
    duration: u64,

    /// Processes to spawn (defaults to one per CPU core)
    #[arg(long, short)]
    workers: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Burn CPU until the deadline (spawned by the parent process)
    #[command(hide = true)]
    Worker {
        /// Deadline in milliseconds since the unix epoch
        #[arg(long)]
        until_ms: u64,
    },
}

/// How the load run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed,
    DeadlineExpired,
    Interrupted,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Worker { until_ms }) => run_worker(until_ms).await,
        None => {
            let workers = cli.workers.unwrap_or_else(available_cores);
            generate_load(Duration::from_secs(cli.duration), workers).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn available_cores() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

async fn run_worker(until_ms: u64) -> Result<()> {
    let deadline = worker::deadline_from_millis(until_ms);
    tokio::task::spawn_blocking(move || worker::burn_until(deadline))
        .await
        .context("Worker thread panicked")?;
    Ok(())
}

async fn generate_load(duration: Duration, workers: usize) -> Result<()> {
    let workers = workers.max(1);

    print_info("🚀 Generating CPU load for testing...");
    print_info("This will create high CPU usage for testing alerts");
    print_info("Press Ctrl+C to stop generating load");

    let exe = std::env::current_exe().context("Failed to locate own executable")?;
    let until_ms = worker::deadline_after(duration);

    let mut children = Vec::with_capacity(workers);
    for _ in 0..workers {
        let child = Command::new(&exe)
            .arg("worker")
            .arg("--until-ms")
            .arg(until_ms.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("Failed to spawn worker process")?;
        children.push(child);
    }

    print_info(&format!(
        "Started {} for {} seconds",
        format_workers(children.len()),
        duration.as_secs()
    ));

    let outcome = tokio::select! {
        _ = wait_all(&mut children) => Outcome::Completed,
        _ = tokio::time::sleep(duration + DEADLINE_GRACE) => Outcome::DeadlineExpired,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            Outcome::Interrupted
        }
    };

    if outcome == Outcome::Interrupted {
        println!();
        print_warning("Stopping CPU load generation...");
    }

    let terminated = terminate_all(&mut children).await;
    if terminated > 0 {
        print_warning(&format!("Terminated {}", format_workers(terminated)));
    }

    print_success("Load generation finished");
    Ok(())
}

async fn wait_all(children: &mut [Child]) {
    for child in children.iter_mut() {
        let _ = child.wait().await;
    }
}

/// Kill every worker that is still running, returning how many were killed
async fn terminate_all(children: &mut [Child]) -> usize {
    let mut terminated = 0;

    for child in children.iter_mut() {
        if matches!(child.try_wait(), Ok(None)) && child.kill().await.is_ok() {
            terminated += 1;
        }
    }

    terminated
}
