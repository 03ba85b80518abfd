//! Logging initialization for wizard binaries.
//!
//! Logs go to stderr so they never interleave with prompts on stdout.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr.
///
/// The level defaults to `info` (`debug` when `debug_override` is set, e.g.
/// from a `--debug` flag) and can always be overridden through `RUST_LOG`.
pub fn init_logging(debug_override: bool) -> Result<()> {
    let default_level = if debug_override { "debug" } else { "info" };
    let filter =
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}
