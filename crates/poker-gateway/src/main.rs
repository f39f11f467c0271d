//! Planning poker server entry point
//!
//! Run with:
//! ```bash
//! JWT_SECRET=... cargo run -p poker-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use poker_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        address = %config.server.address(),
        persistent = config.database.is_some(),
        outbound_buffer = config.websocket.outbound_buffer,
        heartbeat_interval_ms = config.websocket.heartbeat_interval_ms,
        "Configuration loaded"
    );

    poker_gateway::run(config).await?;

    Ok(())
}
