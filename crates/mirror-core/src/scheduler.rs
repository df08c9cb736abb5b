//! Fixed-interval pass runner
//!
//! Runs a [`SyncPass`] once per interval until cancelled. A pass is awaited
//! before the next tick is taken and missed ticks are skipped, so two
//! passes never touch the replica at the same time. Cancellation is only
//! observed between passes; a running pass always finishes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use crate::audit::{AuditSink, timestamp};
use crate::reconcile::SyncPass;
use crate::report::PassReport;
use crate::{Error, Result};

pub struct Scheduler {
    pass: Arc<dyn SyncPass>,
    sink: Arc<dyn AuditSink>,
    interval: Duration,
}

impl Scheduler {
    /// # Errors
    ///
    /// Returns [`Error::InvalidInterval`] for a zero interval.
    pub fn new(
        pass: Arc<dyn SyncPass>,
        sink: Arc<dyn AuditSink>,
        interval: Duration,
    ) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::InvalidInterval { interval });
        }

        Ok(Self {
            pass,
            sink,
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking on the current tokio runtime.
    ///
    /// Cancel `cancel` and await the handle to stop; the handle resolves
    /// once any in-flight pass has finished.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Tick until `cancel` fires. The first pass starts one interval from
    /// now.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }

        tracing::debug!("Scheduler stopped");
    }

    /// Run a single pass on the blocking pool.
    ///
    /// Errors and panics escaping the pass are recorded and swallowed so
    /// the next tick proceeds normally.
    pub async fn run_once(&self) -> Option<PassReport> {
        self.sink
            .notice(&format!("Synchronization started at {}", timestamp()));

        let pass = Arc::clone(&self.pass);
        let outcome = tokio::task::spawn_blocking(move || pass.run_pass()).await;

        let message = match outcome {
            Ok(Ok(report)) => {
                tracing::info!(%report, "Synchronization pass completed");
                self.sink
                    .notice(&format!("Synchronization completed at {}", timestamp()));
                return Some(report);
            }
            Ok(Err(e)) => e.to_string(),
            Err(e) => e.to_string(),
        };

        tracing::warn!(error = %message, "Synchronization pass failed");
        self.sink
            .record(&format!("Error during synchronization: {message}"));
        None
    }
}
