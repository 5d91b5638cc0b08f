use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{FsError, FsErrorKind};
use crate::fs_port::FilesystemPort;
use crate::node::DirNode;
use crate::stats::Stats;
use crate::work::{WorkItem, WorkQueue};

/// N long-lived workers draining a [`WorkQueue`], applying the refcount
/// sweep described in the crate docs on every completed item.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `worker_count` threads, each looping until the queue closes.
    ///
    /// `on_error` is called from worker threads for every enumeration,
    /// unlink, or rmdir failure; it must not block or panic.
    pub fn spawn<F, P>(
        worker_count: usize,
        queue: Arc<WorkQueue>,
        fs: Arc<P>,
        stats: Arc<Stats>,
        on_error: Arc<F>,
    ) -> Self
    where
        F: Fn(FsError) + Send + Sync + 'static,
        P: FilesystemPort + 'static,
    {
        let handles = (0..worker_count)
            .map(|_| {
                let queue = Arc::clone(&queue);
                let fs = Arc::clone(&fs);
                let stats = Arc::clone(&stats);
                let on_error = Arc::clone(&on_error);
                thread::spawn(move || worker_loop(&queue, fs.as_ref(), &stats, on_error.as_ref()))
            })
            .collect();
        Self { handles }
    }

    /// Block until every worker has exited (the queue has closed and
    /// drained).
    pub fn join(self) {
        for handle in self.handles {
            // A worker thread never panics on ordinary I/O failure (those
            // are routed through `on_error`); a join failure here means a
            // genuine bug and should propagate as one.
            handle.join().expect("worker thread panicked");
        }
    }
}

fn worker_loop<P, F>(queue: &WorkQueue, fs: &P, stats: &Stats, on_error: &F)
where
    P: FilesystemPort,
    F: Fn(FsError),
{
    while let Some(item) = queue.dequeue() {
        let current = process_item(item, queue, fs, stats, on_error);
        sweep_upward(current, fs, stats, on_error);
        queue.complete();
    }
}

/// Handle one dequeued item, returning the node from which the upward
/// sweep should start (the file's parent, or the directory itself).
fn process_item<P, F>(
    item: WorkItem,
    queue: &WorkQueue,
    fs: &P,
    stats: &Stats,
    on_error: &F,
) -> Option<Arc<DirNode>>
where
    P: FilesystemPort,
    F: Fn(FsError),
{
    match item {
        WorkItem::FileWork { path, parent } => {
            if let Err(source) = fs.remove_entry(&path, false) {
                stats.error_occurred();
                on_error(FsError {
                    path,
                    kind: FsErrorKind::Unlink,
                    source,
                });
            } else {
                stats.file_removed();
            }
            parent
        }
        WorkItem::DirWork(dir) => {
            enumerate_and_enqueue(&dir, queue, fs, on_error, stats);
            Some(dir)
        }
    }
}

/// Enumerate a directory and push one child `WorkItem` per entry.
///
/// The parent's refcount is incremented *before* each push (spec: "Order:
/// increment first, then enqueue"), so a concurrent worker racing to
/// complete a sibling can never observe the refcount low enough to trigger
/// a premature `rmdir`.
fn enumerate_and_enqueue<P, F>(dir: &Arc<DirNode>, queue: &WorkQueue, fs: &P, on_error: &F, stats: &Stats)
where
    P: FilesystemPort,
    F: Fn(FsError),
{
    match fs.list_directory(dir.path()) {
        Ok(entries) => {
            for entry in entries {
                dir.add_pending(1);
                let item = if entry.is_directory {
                    WorkItem::DirWork(DirNode::new(entry.name, Some(Arc::clone(dir))))
                } else {
                    WorkItem::FileWork {
                        path: entry.name,
                        parent: Some(Arc::clone(dir)),
                    }
                };
                queue.enqueue(item);
            }
        }
        Err(source) => {
            // No child items are produced; the self-token discharge still
            // runs below, so a later rmdir attempt will be made (and will
            // usually fail, adding a second error) rather than pinning the
            // tree forever.
            stats.error_occurred();
            on_error(FsError {
                path: dir.path().clone(),
                kind: FsErrorKind::Enumerate,
                source,
            });
        }
    }
}

/// Discharge `current`'s token and, on reaching zero, remove the directory
/// and repeat at its parent — continuing upward even through an `rmdir`
/// failure so a failed middle node never pins the rest of the tree.
fn sweep_upward<P, F>(mut current: Option<Arc<DirNode>>, fs: &P, stats: &Stats, on_error: &F)
where
    P: FilesystemPort,
    F: Fn(FsError),
{
    while let Some(node) = current {
        if !node.discharge() {
            break;
        }
        match fs.remove_entry(node.path(), true) {
            Ok(()) => stats.dir_removed(),
            Err(source) => {
                stats.error_occurred();
                on_error(FsError {
                    path: node.path().clone(),
                    kind: FsErrorKind::Rmdir,
                    source,
                });
            }
        }
        current = node.parent().cloned();
    }
}
