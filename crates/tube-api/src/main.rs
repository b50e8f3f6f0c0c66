//! Tube API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p tube-api
//! ```
//!
//! Configuration is read from environment variables (and `.env`).

use anyhow::Context;
use tube_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Server exited with an error: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Tracing needs the log format, so configuration comes first.
    let config = AppConfig::from_env().context("failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_format(config.logging.format)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        port = config.api.port,
        "Starting Tube API server"
    );

    tube_api::run(config).await.context("server error")
}
