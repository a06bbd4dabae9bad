//! Command-line interface

use clap::Parser;
use monitor_lib::{LogFormat, SamplerSource};
use std::path::PathBuf;

/// CPU Health Monitoring System
#[derive(Debug, Parser)]
#[command(name = "cpu-monitor")]
#[command(author, version, about = "CPU Health Monitoring System", long_about = None)]
pub struct Cli {
    /// Alert when CPU usage is above this percentage [default: 80]
    #[arg(long, short, allow_negative_numbers = true)]
    pub threshold: Option<f64>,

    /// Seconds between checks [default: 2]
    #[arg(long, short, allow_negative_numbers = true)]
    pub interval: Option<f64>,

    /// Seconds to wait after a failed sample [default: 5]
    #[arg(long, allow_negative_numbers = true)]
    pub retry_backoff: Option<f64>,

    /// Stop after this many failed samples in a row, at least 1 (retries forever if unset)
    #[arg(long)]
    pub max_consecutive_failures: Option<u32>,

    /// CPU metric source (auto, procfs, sysinfo)
    #[arg(long, default_value = "auto")]
    pub source: SamplerSource,

    /// Root of the proc filesystem
    #[arg(long, default_value = "/proc")]
    pub proc_root: PathBuf,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Diagnostic log format on stderr (text, json)
    #[arg(long, env = "CPU_MONITOR_LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,
}
