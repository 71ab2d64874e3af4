//! Tracing subscriber setup shared by the binaries

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` from the process environment wins over the configured default.
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log));

    let directives = filter.to_string();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .pretty()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;

    tracing::info!(filter = %directives, "Tracing initialised");
    Ok(())
}
