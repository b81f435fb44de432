use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Human-readable logs on stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {}", e))
}
