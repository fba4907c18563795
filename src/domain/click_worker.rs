//! Background click persistence workers.
//!
//! A fixed pool of tokio tasks drains the [`ClickQueue`] and writes each event
//! through a [`ClickSink`]. Persistence failures are logged and discarded:
//! the redirect that produced the event has already been answered.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::click_queue::ClickQueue;
use crate::domain::repositories::ClickSink;

/// Counters shared by all workers of a pool.
#[derive(Debug, Default)]
pub struct WorkerStats {
    persisted: AtomicU64,
    failed: AtomicU64,
    in_flight: AtomicU64,
}

impl WorkerStats {
    pub fn persisted(&self) -> u64 {
        self.persisted.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Events taken off the queue whose write has not finished yet.
    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Outcome of [`ClickWorkerPool::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Clicks written over the pool's lifetime.
    pub persisted: u64,
    /// Clicks the sink rejected over the pool's lifetime.
    pub failed: u64,
    /// Events dropped by the queue (full or closed).
    pub dropped: u64,
    /// Events lost when the drain gave up: those still buffered plus those
    /// a worker had dequeued but not finished writing.
    pub abandoned: usize,
    /// Whether the drain timeout elapsed before every worker exited.
    pub timed_out: bool,
}

/// A fixed-size set of click workers sharing one queue.
///
/// Workers stop on their own once the queue is closed and empty;
/// [`ClickWorkerPool::shutdown`] closes the queue and joins them.
pub struct ClickWorkerPool {
    queue: ClickQueue,
    handles: Vec<JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl ClickWorkerPool {
    /// Spawns `count` workers on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(count: usize, queue: ClickQueue, sink: Arc<dyn ClickSink>) -> Self {
        let stats = Arc::new(WorkerStats::default());

        let handles = (0..count)
            .map(|worker_id| {
                tokio::spawn(run_click_worker(
                    worker_id,
                    queue.clone(),
                    sink.clone(),
                    stats.clone(),
                ))
            })
            .collect();

        info!(
            workers = count,
            capacity = queue.capacity(),
            "Click workers started"
        );

        Self {
            queue,
            handles,
            stats,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// Closes the queue and waits up to `drain_timeout` for the backlog to be
    /// persisted. Workers still running after the timeout are aborted.
    pub async fn shutdown(self, drain_timeout: Duration) -> DrainReport {
        let Self {
            queue,
            handles,
            stats,
        } = self;

        queue.close();
        info!(
            workers = handles.len(),
            buffered = queue.len(),
            timeout_ms = drain_timeout.as_millis() as u64,
            "Draining click queue"
        );

        let abort_handles: Vec<_> = handles.iter().map(JoinHandle::abort_handle).collect();

        let joined = tokio::time::timeout(drain_timeout, async move {
            for handle in handles {
                if let Err(e) = handle.await
                    && e.is_panic()
                {
                    error!(error = %e, "Click worker panicked");
                }
            }
        })
        .await;

        let timed_out = joined.is_err();
        if timed_out {
            for handle in &abort_handles {
                handle.abort();
            }
            warn!(
                buffered = queue.len(),
                in_flight = stats.in_flight(),
                "Click drain timed out, abandoning unsaved events"
            );
        }

        let abandoned = if timed_out {
            queue.len() + stats.in_flight() as usize
        } else {
            queue.len()
        };

        let report = DrainReport {
            persisted: stats.persisted(),
            failed: stats.failed(),
            dropped: queue.dropped(),
            abandoned,
            timed_out,
        };

        info!(
            persisted = report.persisted,
            failed = report.failed,
            dropped = report.dropped,
            abandoned = report.abandoned,
            "Click workers stopped"
        );

        report
    }
}

/// Worker loop: dequeue, persist, repeat until the queue is closed and drained.
pub async fn run_click_worker(
    worker_id: usize,
    queue: ClickQueue,
    sink: Arc<dyn ClickSink>,
    stats: Arc<WorkerStats>,
) {
    debug!(worker_id, "Click worker running");

    while let Some(event) = queue.dequeue().await {
        stats.in_flight.fetch_add(1, Ordering::AcqRel);
        let result = sink.create(event.to_new_click()).await;
        stats.in_flight.fetch_sub(1, Ordering::AcqRel);

        match result {
            Ok(click) => {
                stats.persisted.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("clicks_persisted_total").increment(1);
                debug!(worker_id, link_id = click.link_id, click_id = click.id, "Click recorded");
            }
            Err(e) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("clicks_failed_total").increment(1);
                error!(
                    worker_id,
                    link_id = event.link_id,
                    user_agent = %event.user_agent,
                    ip = %event.ip,
                    error = %e,
                    "Failed to save click"
                );
            }
        }
    }

    debug!(worker_id, "Click worker exiting, queue closed and drained");
}
