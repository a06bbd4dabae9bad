//! CPU Monitor - host CPU health monitoring
//!
//! Polls host CPU utilization at a fixed interval, prints a status line per
//! reading, counts readings above the threshold and prints a summary when
//! stopped with Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use monitor_lib::{
    create_sampler, init_tracing, sampler::DEFAULT_SAMPLE_WINDOW, ConsoleReporter, MonitorBuilder,
    MonitorLogger, RunSummary, ShutdownFlag, StopReason,
};
use std::process::ExitCode;
use tracing::info;

mod cli;
mod config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.log_format);

    match run(cli).await {
        Ok(summary) => match summary.stop_reason {
            StopReason::Signal => ExitCode::SUCCESS,
            StopReason::Fatal(_) => ExitCode::FAILURE,
        },
        Err(e) => {
            eprintln!("{} Program failed to start: {:#}", "✗".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> Result<RunSummary> {
    let env = config::EnvSettings::load()?;
    let config = config::resolve(&cli, &env).context("Invalid configuration")?;

    let sampler = create_sampler(cli.source, &cli.proc_root, DEFAULT_SAMPLE_WINDOW)
        .await
        .with_context(|| format!("No usable CPU metric source ({})", cli.source))?;

    let shutdown = ShutdownFlag::new();
    let _signals = shutdown
        .listen_for_signals()
        .context("Failed to register signal handlers")?;

    let mut reporter = ConsoleReporter::stdout();
    if cli.no_color {
        reporter = reporter.with_color(false);
    }

    let logger = MonitorLogger::for_local_host();
    info!(host = %logger.host(), sampler = sampler.name(), "Monitor configured");

    let monitor = MonitorBuilder::new()
        .config(config)
        .sampler(sampler)
        .reporter(Box::new(reporter))
        .shutdown(shutdown)
        .logger(logger)
        .build()?;

    Ok(monitor.run().await)
}
