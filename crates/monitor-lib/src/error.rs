//! Error types for the monitor

use std::path::PathBuf;
use thiserror::Error;

/// A single CPU sample could not be taken
///
/// Every variant is recoverable inside the monitoring loop.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("CPU metrics are not supported on this platform")]
    Unsupported,

    #[error("permission denied reading {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CPU statistics: {0}")]
    Malformed(String),
}

impl SamplingError {
    /// Map an I/O failure on `path` to the matching variant
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => SamplingError::PermissionDenied { path },
            std::io::ErrorKind::NotFound => SamplingError::Unsupported,
            _ => SamplingError::Io { path, source },
        }
    }
}

/// Invalid configuration supplied at startup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("threshold must be a percentage between 0 and 100, got {0}")]
    InvalidThreshold(f64),

    #[error("interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f64),

    #[error("retry backoff must be zero or more seconds, got {0}")]
    InvalidBackoff(f64),

    #[error("max consecutive failures must be at least 1 (omit it to retry forever)")]
    InvalidFailureBudget,
}

/// Unrecoverable error that ends the monitoring loop
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("{0} is required")]
    MissingComponent(&'static str),

    #[error("{failures} consecutive sampling failures, last error: {last}")]
    FailureBudgetExhausted {
        failures: u32,
        #[source]
        last: SamplingError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_from_io_permission_denied() {
        let err = SamplingError::from_io(
            "/proc/stat",
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(matches!(err, SamplingError::PermissionDenied { .. }));
        assert_eq!(err.to_string(), "permission denied reading /proc/stat");
    }

    #[test]
    fn test_from_io_not_found_is_unsupported() {
        let err = SamplingError::from_io("/proc/stat", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, SamplingError::Unsupported));
    }

    #[test]
    fn test_from_io_other() {
        let err = SamplingError::from_io("/proc/stat", io::Error::other("EIO"));
        assert!(matches!(err, SamplingError::Io { .. }));
        assert!(err.to_string().contains("EIO"));
    }
}
