//! Bounded, lossy, multi-producer/multi-consumer click event queue.
//!
//! Producers (redirect requests) never wait: when the buffer is full the
//! event is dropped and a warning is logged. Consumers (click workers)
//! suspend in [`ClickQueue::dequeue`] until an event is available.
//!
//! Closing the queue rejects further events but leaves buffered ones
//! available, so workers drain the backlog and then observe `None`.

use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicU64, AtomicUsize, Ordering},
};

use tokio::sync::{
    Mutex,
    mpsc::{self, error::TrySendError},
};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;

/// Handle to a shared click queue.
///
/// Cloning is cheap; all clones refer to the same buffer.
#[derive(Clone)]
pub struct ClickQueue {
    shared: Arc<Shared>,
}

struct Shared {
    /// `None` once the queue is closed. Dropping the only sender closes the channel.
    sender: RwLock<Option<mpsc::Sender<ClickEvent>>>,
    /// Consumers take turns waiting on the receiver.
    receiver: Mutex<mpsc::Receiver<ClickEvent>>,
    capacity: usize,
    len: AtomicUsize,
    dropped: AtomicU64,
}

impl ClickQueue {
    /// Creates a queue holding at most `capacity` events.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);

        Self {
            shared: Arc::new(Shared {
                sender: RwLock::new(Some(sender)),
                receiver: Mutex::new(receiver),
                capacity,
                len: AtomicUsize::new(0),
                dropped: AtomicU64::new(0),
            }),
        }
    }

    /// Offers an event without blocking.
    ///
    /// Returns `false` if the event was dropped because the queue is full or closed.
    pub fn try_enqueue(&self, event: ClickEvent) -> bool {
        let guard = self
            .shared
            .sender
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(sender) = guard.as_ref() else {
            self.record_drop();
            debug!(short_code = %event.short_code, "Click queue closed, dropping click event");
            return false;
        };

        // Counted before the send so a racing dequeue never decrements first.
        self.shared.len.fetch_add(1, Ordering::AcqRel);

        match sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                self.shared.len.fetch_sub(1, Ordering::AcqRel);
                self.record_drop();
                warn!(
                    short_code = %event.short_code,
                    capacity = self.shared.capacity,
                    "Click queue full, dropping click event"
                );
                false
            }
            Err(TrySendError::Closed(event)) => {
                self.shared.len.fetch_sub(1, Ordering::AcqRel);
                self.record_drop();
                debug!(short_code = %event.short_code, "Click queue closed, dropping click event");
                false
            }
        }
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once the queue is closed and every buffered event has
    /// been handed out.
    pub async fn dequeue(&self) -> Option<ClickEvent> {
        let event = self.shared.receiver.lock().await.recv().await;

        if event.is_some() {
            self.shared.len.fetch_sub(1, Ordering::AcqRel);
        }

        event
    }

    /// Rejects all further events. Buffered events stay available. Idempotent.
    pub fn close(&self) {
        let sender = self
            .shared
            .sender
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if sender.is_some() {
            info!(buffered = self.len(), "Click queue closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared
            .sender
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Maximum number of buffered events.
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Number of events currently buffered, never more than [`ClickQueue::capacity`].
    ///
    /// Producers count an event just before handing it to the channel, so
    /// racing enqueues on a full queue briefly overshoot the raw counter.
    pub fn len(&self) -> usize {
        self.shared
            .len
            .load(Ordering::Acquire)
            .min(self.shared.capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total events dropped since the queue was created.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    fn record_drop(&self) {
        self.shared.dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("clicks_dropped_total").increment(1);
    }
}

impl std::fmt::Debug for ClickQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickQueue")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("dropped", &self.dropped())
            .field("closed", &self.is_closed())
            .finish()
    }
}
