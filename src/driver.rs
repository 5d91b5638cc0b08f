use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::FsError;
use crate::fs_port::FilesystemPort;
use crate::node::DirNode;
use crate::pool::WorkerPool;
use crate::progress::{self, Progress};
use crate::stats::Stats;
use crate::work::{WorkItem, WorkQueue};

/// Whether the root directory itself is removed at the end of the
/// traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The root is enqueued as a `DirWork` item and removed like any other
    /// directory once empty.
    RemoveRoot,
    /// The root is enumerated once by the driver itself; its children are
    /// pushed as top-level items with no parent, so the root is never
    /// targeted for removal.
    EmptyRoot,
}

pub struct RunConfig {
    pub root: PathBuf,
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub mode: Mode,
    pub progress_interval: Option<Duration>,
}

impl RunConfig {
    #[must_use]
    pub fn worker_count_or_default(requested: Option<usize>) -> usize {
        requested.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        })
    }
}

/// Seeds the traversal, supervises the worker pool, and reports final
/// statistics.
///
/// Returns the [`Stats`] accumulated over the run. Post-start errors never
/// abort the run (spec §7); they are only ever reflected in `Stats::errors`
/// and relayed through `on_error`.
pub fn run<P, F>(config: RunConfig, fs: Arc<P>, on_error: Arc<F>) -> Arc<Stats>
where
    P: FilesystemPort + 'static,
    F: Fn(FsError) + Send + Sync + 'static,
{
    let queue = Arc::new(WorkQueue::new(config.queue_capacity, config.worker_count));
    let stats = Arc::new(Stats::new());

    match config.mode {
        Mode::RemoveRoot => {
            let root = DirNode::new(config.root.clone(), None);
            queue.enqueue(WorkItem::DirWork(root));
        }
        Mode::EmptyRoot => {
            seed_empty_root(&config.root, &queue, fs.as_ref(), &stats, on_error.as_ref());
        }
    }

    let progress = config
        .progress_interval
        .map(|interval| Progress::start(Arc::clone(&queue), Arc::clone(&stats), interval));

    let pool = WorkerPool::spawn(
        config.worker_count,
        Arc::clone(&queue),
        fs,
        Arc::clone(&stats),
        on_error,
    );
    pool.join();

    if let Some(progress) = progress {
        progress.stop();
    }
    progress::print_final(&queue, &stats);

    stats
}

/// Empty-root mode: increment `outstanding` to represent the seeding
/// operation itself, enumerate the root synchronously, push one top-level
/// item per child with no parent, then discharge the seeding reservation.
/// If the root was empty, that discharge alone drives `outstanding` to zero
/// and the queue closes immediately with nothing to drain.
fn seed_empty_root<P, F>(root: &PathBuf, queue: &WorkQueue, fs: &P, stats: &Stats, on_error: &F)
where
    P: FilesystemPort,
    F: Fn(FsError),
{
    queue.reserve();
    match fs.list_directory(root) {
        Ok(entries) => {
            for entry in entries {
                let item = if entry.is_directory {
                    WorkItem::DirWork(DirNode::new(entry.name, None))
                } else {
                    WorkItem::FileWork {
                        path: entry.name,
                        parent: None,
                    }
                };
                queue.enqueue(item);
            }
        }
        Err(source) => {
            stats.error_occurred();
            on_error(FsError {
                path: root.clone(),
                kind: crate::error::FsErrorKind::Enumerate,
                source,
            });
        }
    }
    queue.complete();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_port::fake::{FakeFilesystem, Node};

    fn config(root: PathBuf, mode: Mode) -> RunConfig {
        RunConfig {
            root,
            worker_count: 4,
            queue_capacity: 1024,
            mode,
            progress_interval: None,
        }
    }

    #[test]
    fn empty_root_mode_preserves_root_and_removes_children() {
        let root = PathBuf::from("/t");
        let tree = Node::Dir(vec![
            (PathBuf::from("d1"), Node::Dir(vec![])),
            (PathBuf::from("d2"), Node::Dir(vec![])),
            (PathBuf::from("d3"), Node::Dir(vec![])),
            (PathBuf::from("d4"), Node::Dir(vec![])),
            (PathBuf::from("d5"), Node::Dir(vec![])),
        ]);
        let fs = Arc::new(FakeFilesystem::new(root.clone(), tree));
        let on_error: Arc<dyn Fn(FsError) + Send + Sync> = Arc::new(|_| {});
        let stats = run(config(root.clone(), Mode::EmptyRoot), Arc::clone(&fs), on_error);
        assert_eq!(stats.dirs(), 5);
        assert_eq!(stats.files(), 0);
        assert!(!fs.removed.lock().unwrap().iter().any(|(p, _)| p == &root));
    }

    #[test]
    fn empty_root_mode_on_truly_empty_root_terminates() {
        let root = PathBuf::from("/t");
        let fs = Arc::new(FakeFilesystem::new(root.clone(), Node::Dir(vec![])));
        let on_error: Arc<dyn Fn(FsError) + Send + Sync> = Arc::new(|_| {});
        let stats = run(config(root, Mode::EmptyRoot), fs, on_error);
        assert_eq!(stats.dirs(), 0);
        assert_eq!(stats.files(), 0);
    }

    #[test]
    fn remove_root_mode_removes_everything_including_root() {
        let root = PathBuf::from("/t");
        let tree = Node::Dir(vec![(PathBuf::from("a.txt"), Node::File)]);
        let fs = Arc::new(FakeFilesystem::new(root.clone(), tree));
        let on_error: Arc<dyn Fn(FsError) + Send + Sync> = Arc::new(|_| {});
        let stats = run(config(root.clone(), Mode::RemoveRoot), Arc::clone(&fs), on_error);
        assert_eq!(stats.dirs(), 1);
        assert_eq!(stats.files(), 1);
        assert!(fs.removed.lock().unwrap().iter().any(|(p, d)| p == &root && *d));
    }
}
