// Message structures exchanged with the transport layer

use crate::core::error::{GridError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub secs: u32,
    pub nsecs: u32,
}

impl Time {
    pub fn new(secs: u32, nsecs: u32) -> Self {
        Self { secs, nsecs }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub seq: u32,
    #[serde(default)]
    pub stamp: Time,
    #[serde(default)]
    pub frame_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub orientation: Quaternion,
}

/// Metadata about the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMetaData {
    /// The time at which the map was loaded.
    #[serde(default)]
    pub map_load_time: Time,

    /// Meters per cell.
    pub resolution: f32,

    pub width: u32,
    pub height: u32,

    /// Real-world pose of cell (0, 0).
    #[serde(default)]
    pub origin: Pose,
}

/// Row-major grid of occupancy values: -1 unknown, 0 free, anything else occupied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    #[serde(default)]
    pub header: Header,
    pub info: MapMetaData,
    pub data: Vec<i8>,
}

impl OccupancyGrid {
    pub fn new(header: Header, info: MapMetaData, data: Vec<i8>) -> Result<Self> {
        let grid = Self { header, info, data };
        grid.validate()?;
        Ok(grid)
    }

    pub fn cell_count(&self) -> usize {
        self.info.width as usize * self.info.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.info.width == 0 || self.info.height == 0
    }

    pub fn validate(&self) -> Result<()> {
        let resolution = f64::from(self.info.resolution);
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(GridError::InvalidResolution(resolution));
        }

        if self.data.len() != self.cell_count() {
            return Err(GridError::InvalidGrid(format!(
                "Expected {} cells for {}x{}, got {}",
                self.cell_count(),
                self.info.width,
                self.info.height,
                self.data.len()
            )));
        }

        Ok(())
    }
}

/// Encoded raster image plus the metadata needed to place it in the world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompressedBitmap {
    pub header: Header,
    pub origin: Pose,
    pub resolution_x: f32,
    pub resolution_y: f32,
    pub format: String,
    pub data: Vec<u8>,
}
