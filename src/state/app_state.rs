use std::sync::Arc;
use tokio::sync::RwLock;

use gridmap_transport::{CompressedBitmap, GridTransformer, OccupancyGrid};

/// Latest published outputs. New subscribers get these, like a latched topic.
#[derive(Default)]
pub struct Latched {
    pub scaled_map: Option<OccupancyGrid>,
    pub compressed_map: Option<CompressedBitmap>,
}

#[derive(Clone)]
pub struct AppState {
    pub transformer: Arc<GridTransformer>,
    pub latched: Arc<RwLock<Latched>>,
}

impl AppState {
    pub fn new(transformer: GridTransformer) -> Self {
        Self {
            transformer: Arc::new(transformer),
            latched: Arc::new(RwLock::new(Latched::default())),
        }
    }

    /// Replaces both outputs at once, so readers never see a mixed pair.
    pub async fn publish(&self, scaled_map: OccupancyGrid, compressed_map: CompressedBitmap) {
        let mut latched = self.latched.write().await;
        latched.scaled_map = Some(scaled_map);
        latched.compressed_map = Some(compressed_map);
    }

    pub async fn scaled_map(&self) -> Option<OccupancyGrid> {
        self.latched.read().await.scaled_map.clone()
    }

    pub async fn compressed_map(&self) -> Option<CompressedBitmap> {
        self.latched.read().await.compressed_map.clone()
    }
}
