//! Tracing subscriber setup for the `scout` binary.
//!
//! Logs go to stderr. `RUST_LOG` wins over `[logging].filter`; `--verbose`
//! raises both crates to `debug` when `RUST_LOG` is unset.

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging(default_filter: &str, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("movie_scout=debug,movie_scout_core=debug")
        } else {
            EnvFilter::new(default_filter)
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}
