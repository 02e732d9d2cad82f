use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Installs a compact stderr subscriber filtered by `RUST_LOG`.
///
/// Stdout stays free for prompts and the run summary. A second call is a
/// no-op.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
