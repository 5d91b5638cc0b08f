use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::driver::{Mode, RunConfig};
use crate::error::ArgsError;

/// Recursively delete a directory tree in parallel.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Directory to delete
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Number of worker threads (defaults to the available parallelism)
    #[arg(short = 'w', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Empty the directory but keep the root itself
    #[arg(short = 'e', long = "empty-root")]
    pub empty_root: bool,

    /// Suppress the periodic progress line (the final summary still prints)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Seconds between progress lines
    #[arg(long = "progress-interval", value_name = "SECS", default_value_t = 2)]
    pub progress_interval: u64,

    /// Bounded work queue capacity (tuning only; does not affect correctness)
    #[arg(long = "queue-capacity", value_name = "N", default_value_t = 256 * 1024)]
    pub queue_capacity: usize,

    /// Print one line per error encountered, as it happens
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Validate the positional path argument (spec: exit code 4 on
    /// validation failure).
    ///
    /// # Errors
    /// Returns [`ArgsError`] if the path does not exist, is not a
    /// directory, or cannot be canonicalised.
    pub fn validated_root(&self) -> Result<PathBuf, ArgsError> {
        if !self.path.exists() {
            return Err(ArgsError::NotFound(self.path.clone()));
        }
        if !self.path.is_dir() {
            return Err(ArgsError::NotADirectory(self.path.clone()));
        }
        self.path
            .canonicalize()
            .map_err(|e| ArgsError::Canonicalize(self.path.clone(), e))
    }

    #[must_use]
    pub fn run_config(&self, root: PathBuf) -> RunConfig {
        RunConfig {
            root,
            worker_count: RunConfig::worker_count_or_default(self.workers),
            queue_capacity: self.queue_capacity,
            mode: if self.empty_root {
                Mode::EmptyRoot
            } else {
                Mode::RemoveRoot
            },
            progress_interval: if self.quiet {
                None
            } else {
                Some(Duration::from_secs(self.progress_interval))
            },
        }
    }
}
