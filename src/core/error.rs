// Error handling for the grid transport core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("All colors need to have the same format (occupied={occupied}, free={free}, unknown={unknown})")]
    PaletteFormatMismatch {
        occupied: &'static str,
        free: &'static str,
        unknown: &'static str,
    },

    #[error("Scaling produces an empty image: {width}x{height}")]
    DegenerateScaling { width: u32, height: u32 },

    #[error("Scaled image too large: {width}x{height}")]
    ScaledSizeTooLarge { width: f64, height: f64 },

    #[error("Invalid resolution: {0}")]
    InvalidResolution(f64),

    #[error("Invalid occupancy grid: {0}")]
    InvalidGrid(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
