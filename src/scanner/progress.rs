//! Scan progress reporting
//!
//! The scan loop calls `start`, `progress` once per file, then exactly one
//! of `stop` or `cancel`. [`LoggingProgressReport`] runs a background thread
//! that logs how far the scan got at a fixed interval.

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(10);

/// Receives scan lifecycle events
pub trait ProgressReport: Send {
    fn start(&mut self, total: usize);

    /// `current` files are done
    fn progress(&mut self, current: usize);

    /// The scan ran to completion
    fn stop(&mut self);

    /// The scan was cancelled or aborted
    fn cancel(&mut self);
}

/// Ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgressReport;

impl ProgressReport for SilentProgressReport {
    fn start(&mut self, _total: usize) {}
    fn progress(&mut self, _current: usize) {}
    fn stop(&mut self) {}
    fn cancel(&mut self) {}
}

impl<R: ProgressReport + ?Sized> ProgressReport for Box<R> {
    fn start(&mut self, total: usize) {
        (**self).start(total)
    }
    fn progress(&mut self, current: usize) {
        (**self).progress(current)
    }
    fn stop(&mut self) {
        (**self).stop()
    }
    fn cancel(&mut self) {
        (**self).cancel()
    }
}

struct Worker {
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

/// Logs progress through `tracing` from a background thread
pub struct LoggingProgressReport {
    interval: Duration,
    total: usize,
    done: Arc<AtomicUsize>,
    started: Option<Instant>,
    worker: Option<Worker>,
}

impl LoggingProgressReport {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            total: 0,
            done: Arc::new(AtomicUsize::new(0)),
            started: None,
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            // A closed channel also wakes the thread
            let _ = worker.shutdown.send(());
            if worker.handle.join().is_err() {
                warn!("Progress report thread panicked");
            }
        }
    }
}

impl Default for LoggingProgressReport {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_INTERVAL)
    }
}

impl ProgressReport for LoggingProgressReport {
    fn start(&mut self, total: usize) {
        self.join_worker();
        self.total = total;
        self.done.store(0, Ordering::Release);
        let started = Instant::now();
        self.started = Some(started);
        info!("{} source files to be analyzed", total);

        let (tx, rx) = bounded::<()>(1);
        let done = Arc::clone(&self.done);
        let interval = self.interval;
        // Log through the caller's subscriber, not only the global one
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        let handle = std::thread::spawn(move || {
            tracing::dispatcher::with_default(&dispatch, || loop {
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let current = done.load(Ordering::Acquire);
                        info!(
                            "{}/{} files analyzed after {:.0?}, {} remaining",
                            current,
                            total,
                            started.elapsed(),
                            total.saturating_sub(current)
                        );
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
        });
        self.worker = Some(Worker { shutdown: tx, handle });
    }

    fn progress(&mut self, current: usize) {
        self.done.store(current, Ordering::Release);
    }

    fn stop(&mut self) {
        self.join_worker();
        let elapsed = self.started.map(|s| s.elapsed()).unwrap_or_default();
        info!(
            "{}/{} source files have been analyzed in {:.2?}",
            self.done.load(Ordering::Acquire),
            self.total,
            elapsed
        );
    }

    fn cancel(&mut self) {
        self.join_worker();
        warn!(
            "Analysis interrupted after {}/{} files",
            self.done.load(Ordering::Acquire),
            self.total
        );
    }
}

impl Drop for LoggingProgressReport {
    fn drop(&mut self) {
        self.join_worker();
    }
}
