use anyhow::Context;
use dotenvy::dotenv;
use log::info;

use leadserver::core::config::AppConfig;
use leadserver::main_module::{create_app_state, init_logging, run_axum_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let config = AppConfig::load().context("Failed to load configuration")?;
    info!(
        "Starting {} {} ({:?}, {:?} storage)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.server.environment,
        config.storage.backend
    );

    let app_state = create_app_state(config).await?;
    run_axum_server(app_state)
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}
