//! Core library for the CPU health monitor
//!
//! This crate provides:
//! - Host CPU sampling from procfs or `sysinfo`
//! - Threshold classification of readings
//! - Console reporting of readings, alerts and the run summary
//! - The monitoring loop with signal-driven graceful shutdown
//! - Structured logging setup

pub mod classifier;
pub mod controller;
pub mod error;
pub mod models;
pub mod observability;
pub mod reporter;
pub mod sampler;

pub use classifier::classify;
pub use controller::{Monitor, MonitorBuilder, MonitorState, Phase, ShutdownFlag};
pub use error::{ConfigError, MonitorError, SamplingError};
pub use models::*;
pub use observability::{init_tracing, LogFormat, MonitorLogger};
pub use reporter::{ConsoleReporter, Reporter};
pub use sampler::{create_sampler, CpuSampler, SamplerSource};
