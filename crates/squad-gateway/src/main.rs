//! Gateway entry point
//!
//! Configuration is loaded from environment variables.

use squad_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!("Starting SquadUp gateway...");

    let config = AppConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Failed to load configuration");
    })?;

    info!(env = ?config.app.env, port = config.gateway.port, "Configuration loaded");

    squad_gateway::run(config).await?;

    Ok(())
}
