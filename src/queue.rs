//! Mutex-guarded hand-off between the network thread and the consumer.
//!
//! Producers append one datagram at a time. The consumer takes everything
//! queued so far in a single swap, so the lock is never held while packets
//! are decoded.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::trace;

use crate::datagram::RawDatagram;

type Shared = Arc<Mutex<VecDeque<RawDatagram>>>;

/// Create a connected sender/receiver pair.
pub fn handoff() -> (DatagramSender, DatagramReceiver) {
    let shared: Shared = Arc::default();
    (DatagramSender { queue: Arc::downgrade(&shared) }, DatagramReceiver { queue: shared })
}

// A panic while holding the lock cannot leave the deque half-updated, so a
// poisoned queue is still usable.
fn lock(queue: &Shared) -> MutexGuard<'_, VecDeque<RawDatagram>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Producer side. Clone it to feed one queue from several threads.
///
/// The queue is owned by the [`DatagramReceiver`]; once it is dropped,
/// pushes are discarded.
#[derive(Debug, Clone)]
pub struct DatagramSender {
    queue: Weak<Mutex<VecDeque<RawDatagram>>>,
}

impl DatagramSender {
    /// Append a datagram. Returns `false` if the receiver is gone.
    pub fn push(&self, datagram: RawDatagram) -> bool {
        match self.queue.upgrade() {
            Some(queue) => {
                lock(&queue).push_back(datagram);
                true
            }
            None => false,
        }
    }

    /// Whether the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.queue.strong_count() == 0
    }
}

/// Consumer side.
#[derive(Debug)]
pub struct DatagramReceiver {
    queue: Shared,
}

impl DatagramReceiver {
    /// Take every queued datagram in arrival order, leaving the queue empty.
    pub fn drain(&self) -> VecDeque<RawDatagram> {
        let drained = std::mem::take(&mut *lock(&self.queue));
        if !drained.is_empty() {
            trace!(count = drained.len(), "Drained datagram queue");
        }
        drained
    }

    pub fn len(&self) -> usize {
        lock(&self.queue).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.queue).is_empty()
    }
}
