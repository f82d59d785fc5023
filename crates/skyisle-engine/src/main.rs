//! # Skyisle
//!
//! Runs a scripted session headlessly and prints the result as JSON.
//!
//! Usage: `skyisle [config.toml]`. Without an argument the config is read
//! from `skyisle.toml` in the working directory; a missing file runs with
//! defaults.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use skyisle_engine::config::{EngineConfig, CONFIG_FILE};
use skyisle_engine::headless;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("skyisle=info".parse()?))
        .init();

    info!("Skyisle starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());
    let mut config = EngineConfig::load_from(&path);
    config.validate()?;

    let report = headless::run(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("Skyisle shutdown complete");
    Ok(())
}
