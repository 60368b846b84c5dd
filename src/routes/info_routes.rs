use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use serde::Serialize;
use tracing::debug;

pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(info_check))
}

pub async fn info_check() -> Response {
    let config = crate::utils::conf_helper::get_cached_config();

    debug!("{} requested", config.name);
    Json(config).into_response()
}

async fn health_check() -> Response {
    Json(HealthStatus {
        status: "ok".to_owned(),
    })
    .into_response()
}

#[derive(Serialize)]
pub struct HealthStatus {
    status: String,
}
