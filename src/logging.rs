//! Optional log output for tools embedding the resolver.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber writing resolver events to stderr.
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails when a global subscriber has
/// already been installed by the host.
pub fn init_logging(default_filter: &str) -> Result<()> {
  let env_filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init()
    .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

  tracing::debug!("asset_locator logging initialized");
  Ok(())
}
