//! Periodic dashboard refresh.
//!
//! A `RefreshTask` calls a tick callback on a background thread at a fixed
//! interval until it is cancelled. The callback receives the tick number
//! and returns whether the task should keep running.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// Default refresh interval for the chart and current level
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// Handle to a running periodic task
pub struct RefreshTask {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl RefreshTask {
    /// Start ticking every `interval`
    ///
    /// The first tick runs immediately. The task ends when `tick` returns
    /// `false` or when it is cancelled.
    pub fn spawn<F>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut(u64) -> bool + Send + 'static,
    {
        let (stop_tx, stop_rx) = channel::<()>();

        let handle = std::thread::spawn(move || {
            let mut ticks = 0u64;
            loop {
                let keep_going = tick(ticks);
                ticks += 1;
                if !keep_going {
                    tracing::debug!("Refresh task finished after {} ticks", ticks);
                    break;
                }

                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    // Stop requested, or the handle was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        tracing::debug!("Refresh task cancelled after {} ticks", ticks);
                        break;
                    }
                }
            }
            ticks
        });

        tracing::info!("Started refresh task every {:?}", interval);
        Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Stop the task and wait for it; returns how many ticks ran
    pub fn cancel(mut self) -> u64 {
        self.shutdown()
    }

    /// Wait for the task to end on its own; returns how many ticks ran
    pub fn join(mut self) -> u64 {
        let ticks = self
            .handle
            .take()
            .map(|h| h.join().unwrap_or(0))
            .unwrap_or(0);
        self.stop.take();
        ticks
    }

    fn shutdown(&mut self) -> u64 {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.handle
            .take()
            .map(|h| h.join().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}
