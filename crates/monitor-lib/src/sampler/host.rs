//! Portable CPU sampling through `sysinfo`

use super::{async_trait, CpuSampler};
use crate::error::SamplingError;
use crate::models::Reading;
use std::time::Duration;
use sysinfo::System;

/// Sampler backed by the `sysinfo` crate
pub struct SysinfoSampler {
    system: System,
    window: Duration,
}

impl SysinfoSampler {
    /// Create a sampler, failing on platforms `sysinfo` cannot read
    pub fn new(window: Duration) -> Result<Self, SamplingError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(SamplingError::Unsupported);
        }

        let mut system = System::new();
        system.refresh_cpu_usage();

        Ok(Self {
            system,
            // sysinfo needs a minimum gap between refreshes to compute usage
            window: window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        })
    }
}

#[async_trait]
impl CpuSampler for SysinfoSampler {
    async fn sample(&mut self) -> Result<Reading, SamplingError> {
        self.system.refresh_cpu_usage();
        tokio::time::sleep(self.window).await;
        self.system.refresh_cpu_usage();

        Ok(Reading(f64::from(self.system.global_cpu_usage())))
    }

    fn name(&self) -> &'static str {
        "sysinfo"
    }
}
