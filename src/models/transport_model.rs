use serde::{Deserialize, Serialize};

use gridmap_transport::TransformConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct TransportConfig {
    pub name: String,
    pub connection: Connection,
    pub transform: TransformConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Connection {
    pub ip: String,
    pub port: u16,
}
