//! Core engine for parallel, recursive directory-tree deletion.
//!
//! The traversal maintains one structural invariant without any central
//! coordinator: a directory is removed only after every descendant it is
//! known to have produced has itself completed. [`node::DirNode`] tracks
//! this with an atomic refcount; [`work::WorkQueue`] turns the count
//! reaching zero, globally, into clean worker-pool shutdown.

#[cfg(all(
    feature = "mimalloc",
    any(target_os = "linux", target_os = "macos", target_os = "android")
))]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod cli;
pub mod driver;
pub mod error;
pub mod fs_port;
pub mod node;
pub mod pool;
pub mod progress;
pub mod stats;
pub mod work;

pub use driver::{Mode, RunConfig};
pub use error::{ArgsError, FsError, FsErrorKind, EXIT_BAD_ARGS};
pub use fs_port::{FilesystemPort, StdFilesystem};
pub use node::DirNode;
pub use pool::WorkerPool;
pub use stats::Stats;
pub use work::{WorkItem, WorkQueue};
