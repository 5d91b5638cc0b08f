use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// A directory known to the traversal.
///
/// `refcount` tracks "descendant work tokens outstanding": it starts at 1
/// (the node's own self-token, discharged once its `DirWork` item is
/// dequeued and enumerated) and gains one token per child `WorkItem` pushed
/// with this node as parent. It reaches zero exactly when the directory has
/// been enumerated and every discovered child has completed — at that
/// point, and only then, `rmdir` may run.
///
/// A signed counter is used deliberately: under the fetch-and-sub race in
/// [`DirNode::discharge`], a transient negative value would indicate a
/// double-discharge bug. An unsigned counter would wrap instead of making
/// that bug visible.
#[derive(Debug)]
pub struct DirNode {
    parent: Option<Arc<DirNode>>,
    path: PathBuf,
    refcount: AtomicI64,
}

impl DirNode {
    /// Construct a node with the self-token already accounted for.
    #[must_use]
    pub fn new(path: PathBuf, parent: Option<Arc<DirNode>>) -> Arc<Self> {
        Arc::new(Self {
            parent,
            path,
            refcount: AtomicI64::new(1),
        })
    }

    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Arc<DirNode>> {
        self.parent.as_ref()
    }

    /// Record that one more work item (child or self) is outstanding against
    /// this node. Must happen before the corresponding item is made visible
    /// to other workers (pushed to the queue, or processed in-line), so that
    /// no worker can observe a refcount low enough to trigger premature
    /// cleanup.
    #[inline]
    pub fn add_pending(&self, count: i64) {
        self.refcount.fetch_add(count, Ordering::AcqRel);
    }

    /// Discharge one token (a completed child, or this node's own
    /// enumeration). Returns `true` exactly once per node — for the worker
    /// that observes the refcount transition to zero, which is by
    /// construction the only one allowed to `rmdir` this directory.
    #[inline]
    #[must_use]
    pub fn discharge(&self) -> bool {
        self.refcount.fetch_sub(1, Ordering::AcqRel) == 1
    }

    #[cfg(test)]
    #[must_use]
    pub fn refcount(&self) -> i64 {
        self.refcount.load(Ordering::Acquire)
    }
}
