// Cell values, default palette and pixel formats

use serde::{Deserialize, Serialize};
use std::fmt;

// Occupancy cell values
pub const CELL_UNKNOWN: i8 = -1;
pub const CELL_FREE: i8 = 0;
pub const CELL_OCCUPIED: i8 = 100; // canonical value written back on decode

// Default grayscale palette
pub const DEFAULT_COLOR_OCCUPIED: u8 = 0;
pub const DEFAULT_COLOR_FREE: u8 = 1;
pub const DEFAULT_COLOR_UNKNOWN: u8 = 128;

pub const DEFAULT_IMAGE_FORMAT: &str = "png";

// Upper bound on a resampled image: 8192x8192, 256 MiB as RGBA
pub const MAX_SCALED_PIXELS: u64 = 8192 * 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Single channel, 8 bit grayscale.
    #[serde(rename = "L")]
    Luma,
    /// Four channels, 8 bit each.
    #[serde(rename = "RGBA")]
    Rgba,
}

impl PixelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixelFormat::Luma => "L",
            PixelFormat::Rgba => "RGBA",
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Luma => 1,
            PixelFormat::Rgba => 4,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
