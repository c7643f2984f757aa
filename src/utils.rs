//! The `utils` module holds the ambient helpers shared by both CLI subcommands.
use tracing_subscriber::EnvFilter;

/// Initializes the global `tracing` subscriber exactly once, defaulting to `info` level when
/// `RUST_LOG` is unset. Safe to call more than once; later calls are no-ops.
pub fn trace_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
