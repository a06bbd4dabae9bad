//! Shutdown signalling
//!
//! The monitor's `running` flag lives behind a cloneable handle. The signal
//! listener holds one clone and may only clear the flag; the loop checks it
//! at the top of every cycle and before every sleep.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared `running` flag for one monitor run
#[derive(Debug, Clone)]
pub struct ShutdownFlag {
    running: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the loop to stop after the step in progress
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Clear the flag on SIGINT or SIGTERM
    ///
    /// Handlers are registered before this returns, so a failure here is a
    /// startup error. The spawned task does nothing but flip the flag.
    pub fn listen_for_signals(&self) -> io::Result<JoinHandle<()>> {
        let flag = self.clone();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut interrupt = signal(SignalKind::interrupt())?;
            let mut terminate = signal(SignalKind::terminate())?;

            Ok(tokio::spawn(async move {
                loop {
                    let received = tokio::select! {
                        r = interrupt.recv() => r,
                        r = terminate.recv() => r,
                    };
                    if received.is_none() {
                        break;
                    }
                    flag.request_stop();
                }
            }))
        }

        #[cfg(not(unix))]
        {
            Ok(tokio::spawn(async move {
                while tokio::signal::ctrl_c().await.is_ok() {
                    flag.request_stop();
                }
            }))
        }
    }
}

impl Default for ShutdownFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_starts_running() {
        assert!(ShutdownFlag::new().is_running());
    }

    #[test]
    fn test_request_stop_is_shared() {
        let flag = ShutdownFlag::new();
        let handle = flag.clone();

        handle.request_stop();
        assert!(!flag.is_running());

        // idempotent
        handle.request_stop();
        assert!(!flag.is_running());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_listen_for_signals_registers() {
        let flag = ShutdownFlag::new();
        let listener = flag.listen_for_signals().unwrap();

        assert!(flag.is_running());
        listener.abort();
    }
}
