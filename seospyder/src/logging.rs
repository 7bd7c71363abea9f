use crate::config::Logging;
use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Logs go to stderr so rendered reports on stdout stay clean. `RUST_LOG`
/// wins over both the flag and the config file.
pub fn init_logging(level_override: Option<&str>, cfg: &Logging) -> Result<()> {
    let level = level_override.unwrap_or(cfg.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let layer = if cfg.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}
