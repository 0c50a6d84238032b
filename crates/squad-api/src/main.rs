//! SquadUp API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p squad-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use squad_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!("Starting SquadUp API Server...");

    let config = AppConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Failed to load configuration");
    })?;

    info!(
        env = ?config.app.env,
        port = config.api.port,
        "Configuration loaded"
    );

    squad_api::run(config).await.inspect_err(|e| {
        error!(error = %e, "Server failed");
    })?;

    Ok(())
}
