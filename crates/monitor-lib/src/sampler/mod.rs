//! Host CPU sampling
//!
//! A sampler blocks for a fixed measurement window and returns the
//! host-wide CPU utilization over that window. Two backends exist:
//! procfs (`/proc/stat` counters) on Linux and `sysinfo` everywhere
//! else, with automatic selection.

mod host;
mod procfs;


pub use host::SysinfoSampler;
pub use procfs::{CpuTimes, ProcStatSampler};

use crate::error::SamplingError;
use crate::models::Reading;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub use async_trait::async_trait;

/// Measurement window for a single reading
pub const DEFAULT_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Trait for CPU utilization sources
#[async_trait]
pub trait CpuSampler: Send {
    /// Take one reading, waiting out the measurement window
    async fn sample(&mut self) -> Result<Reading, SamplingError>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Which backend to sample from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SamplerSource {
    /// procfs when readable, otherwise sysinfo
    #[default]
    Auto,
    Procfs,
    Sysinfo,
}

impl FromStr for SamplerSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SamplerSource::Auto),
            "procfs" | "proc" => Ok(SamplerSource::Procfs),
            "sysinfo" => Ok(SamplerSource::Sysinfo),
            other => Err(format!(
                "unknown sampler source '{}' (expected auto, procfs or sysinfo)",
                other
            )),
        }
    }
}

impl fmt::Display for SamplerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplerSource::Auto => write!(f, "auto"),
            SamplerSource::Procfs => write!(f, "procfs"),
            SamplerSource::Sysinfo => write!(f, "sysinfo"),
        }
    }
}

/// Create a sampler for the requested source
///
/// Fails when the source cannot be used on this host, which callers treat
/// as a startup error.
pub async fn create_sampler(
    source: SamplerSource,
    proc_root: &Path,
    window: Duration,
) -> Result<Box<dyn CpuSampler>, SamplingError> {
    match source {
        SamplerSource::Procfs => {
            let sampler = ProcStatSampler::probe(proc_root, window).await?;
            tracing::info!(path = %sampler.stat_path().display(), "Using procfs CPU sampler");
            Ok(Box::new(sampler))
        }
        SamplerSource::Sysinfo => {
            tracing::info!("Using sysinfo CPU sampler");
            Ok(Box::new(SysinfoSampler::new(window)?))
        }
        SamplerSource::Auto => match ProcStatSampler::probe(proc_root, window).await {
            Ok(sampler) => {
                tracing::info!(path = %sampler.stat_path().display(), "Detected procfs, using /proc/stat sampler");
                Ok(Box::new(sampler))
            }
            Err(e) => {
                tracing::debug!(error = %e, "procfs unavailable, falling back to sysinfo");
                Ok(Box::new(SysinfoSampler::new(window)?))
            }
        },
    }
}
