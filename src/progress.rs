use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::stats::Stats;
use crate::work::WorkQueue;

/// A periodic reporter thread, external to the core engine: it only reads
/// [`Stats`] and [`WorkQueue::len`], never participates in the refcount
/// protocol.
///
/// Prints one human-oriented line on the interval given, plus a final line
/// when [`Progress::stop`] is called.
pub struct Progress {
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Progress {
    #[must_use]
    pub fn start(queue: Arc<WorkQueue>, stats: Arc<Stats>, interval: Duration) -> Self {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop_flag);
        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                thread::sleep(interval);
                if thread_stop.load(Ordering::Relaxed) {
                    break;
                }
                print_line(&queue, &stats);
            }
        });
        Self {
            stop_flag,
            handle: Some(handle),
        }
    }

    /// Signal the reporter to stop and wait for it to exit. The caller is
    /// expected to print the final summary line itself, after this returns
    /// and the run has fully joined.
    pub fn stop(mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn print_line(queue: &WorkQueue, stats: &Stats) {
    println!(
        "queued: {:>12} dirs: {:>12} files: {:>12} errors: {:>12}",
        queue.len(),
        stats.dirs(),
        stats.files(),
        stats.errors()
    );
}

/// Print the final summary line (spec: "A final line is printed on exit").
pub fn print_final(queue: &WorkQueue, stats: &Stats) {
    print_line(queue, stats);
}
