use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by RUST_LOG (warnings only by default) so logs
/// never mix with rendered output.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {e}"))
}
