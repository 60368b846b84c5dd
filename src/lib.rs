// Occupancy grid <-> bitmap transport
// Main library entry point

pub mod core;

// Re-export main types
pub use core::codec::{image_to_occupancy, occupancy_to_image, PixelBuffer};
pub use core::color::{Color, ColorConfiguration, ColorSpec};
pub use core::compression::ResampleFilter;
pub use core::config::{PaletteConfig, TransformConfig};
pub use core::constants::PixelFormat;
pub use core::error::{GridError, Result};
pub use core::format::{CompressedBitmap, Header, MapMetaData, OccupancyGrid, Point, Pose, Quaternion, Time};
pub use core::scaling::{calculate_resolution, calculate_scaled_size, make_scaled_map_metadata};
pub use core::transform::{
    compress_occupancy_grid, decompress_occupancy_grid, scale_occupancy_grid, GridTransformer,
    ScaleTarget,
};
