use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::node::DirNode;

/// A unit of work: either a file waiting to be unlinked, or a directory
/// waiting to be enumerated and then removed.
#[derive(Debug)]
pub enum WorkItem {
    FileWork {
        path: PathBuf,
        /// The directory this file lives in, for the purpose of the upward
        /// sweep. `None` for a top-level file in empty-root mode.
        parent: Option<Arc<DirNode>>,
    },
    DirWork(Arc<DirNode>),
}

/// Internal channel payload: ordinary work, or a wakeup sentinel used to
/// unblock a worker that is parked in a blocking receive once the queue has
/// gone quiescent.
enum Envelope {
    Item(WorkItem),
    Close,
}

/// A bounded multi-producer/multi-consumer queue of [`WorkItem`]s paired
/// with an `outstanding` counter used for quiescence detection.
///
/// `outstanding` equals the number of items enqueued (or reserved, see
/// [`WorkQueue::reserve`]) whose completion has not yet been recorded via
/// [`WorkQueue::complete`]. When the last outstanding item completes, the
/// queue wakes every worker with a [`Envelope::Close`] sentinel rather than
/// relying on channel disconnection, so `dequeue` can remain a genuine
/// blocking receive (no polling, no mutex) right up to shutdown.
pub struct WorkQueue {
    sender: Sender<Envelope>,
    receiver: Receiver<Envelope>,
    outstanding: AtomicI64,
    worker_count: usize,
}

impl WorkQueue {
    #[must_use]
    pub fn new(capacity: usize, worker_count: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(worker_count));
        Self {
            sender,
            receiver,
            outstanding: AtomicI64::new(0),
            worker_count,
        }
    }

    /// Record one more outstanding unit of work without enqueuing an item.
    ///
    /// Used by the driver to represent its own synchronous root enumeration
    /// in empty-root mode (spec: "seeding operation itself"), so that a
    /// worker racing the driver to complete the last real item can't close
    /// the queue before the driver has finished seeding.
    pub fn reserve(&self) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
    }

    /// Increment `outstanding`, then push. The increment must precede the
    /// push: otherwise a consumer could dequeue and complete the item,
    /// drive `outstanding` to zero, and close the queue before this
    /// producer's increment is even visible.
    ///
    /// # Panics
    /// Panics if the underlying channel has been disconnected, which cannot
    /// happen while the `WorkQueue` (and therefore both channel halves) is
    /// alive.
    pub fn enqueue(&self, item: WorkItem) {
        self.reserve();
        self.sender
            .send(Envelope::Item(item))
            .expect("work queue sender disconnected while queue was alive");
    }

    /// Block until a work item is available, or the queue has reached
    /// quiescence and this worker has been woken to exit.
    #[must_use]
    pub fn dequeue(&self) -> Option<WorkItem> {
        match self.receiver.recv() {
            Ok(Envelope::Item(item)) => Some(item),
            Ok(Envelope::Close) | Err(_) => None,
        }
    }

    /// Record that one previously reserved/enqueued unit of work has
    /// completed. If this was the last one outstanding, wake every worker
    /// so the pool can drain.
    pub fn complete(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            // Every item ever enqueued has, by construction, already been
            // dequeued by the time outstanding reaches zero (see module
            // docs), so the channel buffer is empty and these sentinels
            // cannot block on capacity.
            for _ in 0..self.worker_count {
                let _ = self.sender.send(Envelope::Close);
            }
        }
    }

    /// Current queue length, for progress reporting. Approximate: it races
    /// with concurrent enqueues/dequeues by design.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    #[cfg(test)]
    #[must_use]
    pub fn outstanding(&self) -> i64 {
        self.outstanding.load(Ordering::Acquire)
    }
}
