//! Fisheries dashboard service entry point.

use anyhow::Result;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // TLS crypto provider must be installed before any WS connections.
    fishdash_realtime::init_crypto();

    let (config, config_found) = fishdash_app::AppConfig::load()?;
    fishdash_app::init_logging(&config.telemetry.log_level);

    info!("Starting fishdash v{}", env!("CARGO_PKG_VERSION"));
    if !config_found {
        warn!(path = %fishdash_app::AppConfig::path(), "Config file not found, using defaults");
    }
    info!(api = %config.api_base_url, ws = %config.realtime.url, "Configuration loaded");

    let app = fishdash_app::Application::new(config)?;
    app.run().await?;

    Ok(())
}
