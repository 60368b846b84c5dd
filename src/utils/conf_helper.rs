use anyhow::{anyhow, Context, Result};
use std::sync::OnceLock;
use tokio::fs;
use tokio::net::TcpListener;
use tracing::info;

use crate::models::transport_model::TransportConfig;

static CONFIG_CACHE: OnceLock<TransportConfig> = OnceLock::new();

pub const DEFAULT_CONFIG_PATH: &str = "transport.json";

pub async fn init_config_and_bind(file_path: &str) -> Result<TcpListener> {
    let data = fs::read_to_string(file_path)
        .await
        .with_context(|| format!("File read error: {file_path}"))?;

    let mut config: TransportConfig =
        serde_json::from_str(&data).context("JSON parse error")?;

    let bind_addr = format!("{}:{}", config.connection.ip, config.connection.port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Bind failed: {bind_addr}"))?;

    let actual_port = listener.local_addr().context("Addr error")?.port();

    // Port 0 asks the OS for a free one
    config.connection.port = actual_port;

    CONFIG_CACHE
        .set(config)
        .map_err(|_| anyhow!("Config already initialized"))?;

    info!("Config initialized with port: {}", actual_port);

    Ok(listener)
}

pub fn get_cached_config() -> &'static TransportConfig {
    CONFIG_CACHE.get().expect("Config not initialized")
}
