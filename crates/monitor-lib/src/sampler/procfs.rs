//! `/proc/stat` CPU sampling
//!
//! Reads the aggregate `cpu` line, whose fields are cumulative jiffies:
//! user nice system idle iowait irq softirq steal [guest guest_nice].
//! Guest time is already folded into user/nice, so only the first eight
//! fields count towards the total.

use super::{async_trait, CpuSampler};
use crate::error::SamplingError;
use crate::models::Reading;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Number of leading counters that make up total CPU time
const ACCOUNTED_FIELDS: usize = 8;

/// Cumulative CPU time split into busy and total jiffies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub busy: u64,
    pub total: u64,
}

impl CpuTimes {
    /// Parse the aggregate `cpu` line out of `/proc/stat` contents
    pub fn parse(content: &str) -> Result<Self, SamplingError> {
        let line = content
            .lines()
            .find(|line| line.split_whitespace().next() == Some("cpu"))
            .ok_or_else(|| SamplingError::Malformed("no aggregate cpu line".to_string()))?;

        let fields = line
            .split_whitespace()
            .skip(1)
            .take(ACCOUNTED_FIELDS)
            .map(|field| {
                field.parse::<u64>().map_err(|_| {
                    SamplingError::Malformed(format!("invalid counter '{}'", field))
                })
            })
            .collect::<Result<Vec<u64>, _>>()?;

        // user nice system idle is the oldest layout the kernel ever produced
        if fields.len() < 4 {
            return Err(SamplingError::Malformed(format!(
                "expected at least 4 cpu counters, found {}",
                fields.len()
            )));
        }

        let total: u64 = fields.iter().sum();
        let idle = fields[3] + fields.get(4).copied().unwrap_or(0);

        Ok(Self {
            busy: total.saturating_sub(idle),
            total,
        })
    }

    /// Utilization between an earlier snapshot and this one
    ///
    /// Returns 0.0 when no time elapsed on the counters.
    pub fn usage_since(&self, earlier: &CpuTimes) -> Reading {
        let total_delta = self.total.saturating_sub(earlier.total);
        if total_delta == 0 {
            return Reading(0.0);
        }

        let busy_delta = self.busy as f64 - earlier.busy as f64;
        Reading(busy_delta / total_delta as f64 * 100.0)
    }
}

/// Sampler backed by `/proc/stat`
pub struct ProcStatSampler {
    stat_path: PathBuf,
    window: Duration,
}

impl ProcStatSampler {
    /// Create a sampler reading `<proc_root>/stat`
    pub fn new(proc_root: impl AsRef<Path>, window: Duration) -> Self {
        Self {
            stat_path: proc_root.as_ref().join("stat"),
            window,
        }
    }

    /// Create a sampler only if `<proc_root>/stat` is readable and parses
    pub async fn probe(proc_root: impl AsRef<Path>, window: Duration) -> Result<Self, SamplingError> {
        let sampler = Self::new(proc_root, window);
        sampler.read_times().await?;
        Ok(sampler)
    }

    pub fn stat_path(&self) -> &Path {
        &self.stat_path
    }

    async fn read_times(&self) -> Result<CpuTimes, SamplingError> {
        let content = fs::read_to_string(&self.stat_path)
            .await
            .map_err(|e| SamplingError::from_io(&self.stat_path, e))?;

        CpuTimes::parse(&content)
    }
}

#[async_trait]
impl CpuSampler for ProcStatSampler {
    async fn sample(&mut self) -> Result<Reading, SamplingError> {
        let before = self.read_times().await?;
        tokio::time::sleep(self.window).await;
        let after = self.read_times().await?;

        Ok(after.usage_since(&before))
    }

    fn name(&self) -> &'static str {
        "procfs"
    }
}
