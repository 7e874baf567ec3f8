//! Pieces shared by the `pdf-pages` and `pdf-questions` binaries.

use crate::progress::SliceProgressCallback;
use std::io;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins over the flags; otherwise `--verbose` selects `debug`,
/// `--quiet` selects `error`, and the default is `warn` so that log lines
/// don't drown the `saved` output.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Prints `saved <path>` on stdout as each file is written.
pub struct SavedLinePrinter;

impl SliceProgressCallback for SavedLinePrinter {
    fn on_file_saved(&self, path: &Path) {
        println!("saved {}", path.display());
    }
}
