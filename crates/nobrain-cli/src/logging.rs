//! Logger setup for the CLI tools.

use tracing::Level;

/// Install the global `tracing` subscriber.
///
/// Logs go to stderr so stdout only carries status lines. `verbose` lowers
/// the level from INFO to DEBUG, which shows every packed entry.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    // a subscriber may already be installed when called twice in one process
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
