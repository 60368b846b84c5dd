// Resolution and size calculations for resampled grids

use crate::core::constants::MAX_SCALED_PIXELS;
use crate::core::error::{GridError, Result};
use crate::core::format::MapMetaData;

/// Resolution at which a grid of `current` cells fits into `goal` pixels.
///
/// Both axes get a candidate and the coarser one wins, so the scaled image
/// never exceeds the goal footprint on either axis.
pub fn calculate_resolution(
    goal: (u32, u32),
    current: (u32, u32),
    current_resolution: f64,
) -> f64 {
    let (goal_width, goal_height) = goal;
    let (current_width, current_height) = current;

    let width_resolution = f64::from(current_width) / f64::from(goal_width) * current_resolution;
    let height_resolution =
        f64::from(current_height) / f64::from(goal_height) * current_resolution;

    width_resolution.max(height_resolution)
}

/// Pixel size after resampling from `old_resolution` to `new_resolution`.
/// Each axis is truncated independently.
pub fn calculate_scaled_size(size: (u32, u32), old_resolution: f64, new_resolution: f64) -> (u32, u32) {
    let (width, height) = size;
    let scaling_factor = old_resolution / new_resolution;
    (
        (f64::from(width) * scaling_factor).floor() as u32,
        (f64::from(height) * scaling_factor).floor() as u32,
    )
}

/// Like [`calculate_scaled_size`], but rejects bad resolutions, empty results
/// and results larger than [`MAX_SCALED_PIXELS`].
pub fn checked_scaled_size(
    size: (u32, u32),
    old_resolution: f64,
    new_resolution: f64,
) -> Result<(u32, u32)> {
    for resolution in [old_resolution, new_resolution] {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(GridError::InvalidResolution(resolution));
        }
    }

    let scaling_factor = old_resolution / new_resolution;
    let width = (f64::from(size.0) * scaling_factor).floor();
    let height = (f64::from(size.1) * scaling_factor).floor();

    if width < 1.0 || height < 1.0 {
        return Err(GridError::DegenerateScaling {
            width: width as u32,
            height: height as u32,
        });
    }

    // Compared in f64, the product may not fit any integer type
    if width * height > MAX_SCALED_PIXELS as f64 {
        return Err(GridError::ScaledSizeTooLarge { width, height });
    }

    Ok((width as u32, height as u32))
}

/// Metadata for `info` resampled to `resolution`. Origin and load time are
/// kept as they are: the grid corner does not move when pixel density changes.
pub fn make_scaled_map_metadata(info: &MapMetaData, resolution: f64) -> Result<MapMetaData> {
    let (width, height) = checked_scaled_size(
        (info.width, info.height),
        f64::from(info.resolution),
        resolution,
    )?;

    Ok(MapMetaData {
        map_load_time: info.map_load_time,
        resolution: resolution as f32,
        width,
        height,
        origin: info.origin,
    })
}
