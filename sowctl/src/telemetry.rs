//! Tracing initialization.
//!
//! Sets up tracing-subscriber with console output. The filter comes from
//! `RUST_LOG` when set and defaults to `info` otherwise, e.g.
//!
//! ```bash
//! RUST_LOG=sowctl=debug,tower_http=debug sowctl
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
