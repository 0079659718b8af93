//! Tracing subscriber setup for the binary

use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV;

/// Install a stderr fmt subscriber.
///
/// Directives come from `GETMESH_LOG`, then `RUST_LOG`, then the default
/// level (`debug` with `--verbose`, `warn` otherwise).
pub fn init_logging(verbose: bool) {
    let filter = filter_from(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
        verbose,
    );

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn filter_from(getmesh_log: Option<String>, rust_log: Option<String>, verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "warn" };
    let non_empty = |directives: &String| !directives.is_empty();
    getmesh_log
        .filter(non_empty)
        .or_else(|| rust_log.filter(non_empty))
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}
