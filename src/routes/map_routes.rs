use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::state::app_state::AppState;
use gridmap_transport::{CompressedBitmap, GridError, OccupancyGrid};

/// Response for POST /map
#[derive(Serialize, Debug)]
pub struct PublishSummary {
    pub frame_id: String,
    pub width: u32,
    pub height: u32,
    pub resolution: f32,
    pub format: String,
    pub compressed_bytes: usize,
}

/// =======================
/// ROUTER
/// =======================

pub fn map_routes(state: AppState) -> Router {
    Router::new()
        .route("/map", post(receive_map))
        .route("/scaled_map", get(scaled_map))
        .route("/compressed_map", get(compressed_map))
        .route("/decompress", post(decompress))
        .with_state(state)
}

/// =======================
/// HANDLERS
/// =======================

async fn receive_map(State(state): State<AppState>, Json(grid): Json<OccupancyGrid>) -> Response {
    if grid.is_empty() {
        debug!(
            "Skipping empty map {}x{}",
            grid.info.width, grid.info.height
        );
        return StatusCode::NO_CONTENT.into_response();
    }

    let transformer = state.transformer.clone();

    // Image work is CPU bound, keep it off the async workers
    let result = tokio::task::spawn_blocking(move || {
        let scaled = transformer.scale(&grid)?;
        let compressed = transformer.compress(&grid)?;
        Ok::<_, GridError>((scaled, compressed))
    })
    .await;

    let (scaled, compressed) = match result {
        Ok(Ok(outputs)) => outputs,
        Ok(Err(e)) => {
            error!("Map transform failed: {}", e);
            return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response();
        }
        Err(e) => {
            error!("Map transform task failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let summary = PublishSummary {
        frame_id: scaled.header.frame_id.clone(),
        width: scaled.info.width,
        height: scaled.info.height,
        resolution: scaled.info.resolution,
        format: compressed.format.clone(),
        compressed_bytes: compressed.data.len(),
    };

    info!(
        "Published map {}x{} @ {} ({} {} bytes)",
        summary.width, summary.height, summary.resolution, summary.format, summary.compressed_bytes
    );

    state.publish(scaled, compressed).await;

    Json(summary).into_response()
}

async fn scaled_map(State(state): State<AppState>) -> Response {
    match state.scaled_map().await {
        Some(grid) => Json(grid).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn compressed_map(State(state): State<AppState>) -> Response {
    match state.compressed_map().await {
        Some(bitmap) => Json(bitmap).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn decompress(
    State(state): State<AppState>,
    Json(bitmap): Json<CompressedBitmap>,
) -> Response {
    let transformer = state.transformer.clone();

    let result = tokio::task::spawn_blocking(move || {
        let stamp = bitmap.header.stamp;
        transformer.decompress(&bitmap, stamp)
    })
    .await;

    match result {
        Ok(Ok(grid)) => {
            debug!("Decompressed map {}x{}", grid.info.width, grid.info.height);
            Json(grid).into_response()
        }
        Ok(Err(e)) => {
            error!("Decompress failed: {}", e);
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
        }
        Err(e) => {
            error!("Decompress task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
