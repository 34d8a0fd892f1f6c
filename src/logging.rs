//! Tracing setup for the CLI.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber.
///
/// `verbosity` maps 0=warn, 1=info, 2=debug, 3+=trace; a `RUST_LOG` value
/// overrides the ladder entirely. Logs go to stderr so they never mix with
/// the invite code on stdout.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("linkdrop={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(())
}
