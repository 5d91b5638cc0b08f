use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use pdel::{cli::Args, error::EXIT_BAD_ARGS, fs_port::StdFilesystem, FsError};

fn main() -> ExitCode {
    let args = Args::parse();

    let root = match args.validated_root() {
        Ok(root) => root,
        Err(e) => {
            eprintln!("pdel: {e}");
            return ExitCode::from(EXIT_BAD_ARGS as u8);
        }
    };

    let verbose = args.verbose;
    let on_error: Arc<dyn Fn(FsError) + Send + Sync> = Arc::new(move |err: FsError| {
        if verbose {
            eprintln!("pdel: {err}");
        }
    });

    let config = args.run_config(root);
    let stats = pdel::driver::run(config, Arc::new(StdFilesystem), on_error);

    println!(
        "done: dirs={} files={} errors={}",
        stats.dirs(),
        stats.files(),
        stats.errors()
    );

    // Per spec §6: exit code 0 on successful completion even if individual
    // entries failed; failures are only ever reflected in the error count.
    ExitCode::SUCCESS
}
