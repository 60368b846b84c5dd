use anyhow::Context;
use axum::Router;
use tracing::{info, Level};

mod models;
mod routes;
mod state;
mod utils;

use crate::state::app_state::AppState;
use crate::utils::conf_helper::{get_cached_config, init_config_and_bind, DEFAULT_CONFIG_PATH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    // === CONFIG + LISTENER ===
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let listener = init_config_and_bind(&config_path).await?;

    let config = get_cached_config();

    // Bad target/palette/format settings stop the process before any map arrives
    let transformer = config
        .transform
        .build()
        .context("Invalid transform configuration")?;

    info!(
        "Server initialized on {}:{} (target {:?}, format {}, palette {})",
        config.connection.ip,
        config.connection.port,
        transformer.target(),
        transformer.format(),
        transformer.palette().format()
    );

    let state = AppState::new(transformer);

    let app = Router::new()
        .merge(routes::info_routes::health_routes())
        .merge(routes::map_routes::map_routes(state));

    axum::serve(listener, app).await?;

    Ok(())
}
